//! Client-side request pacing.
//!
//! Keeps a minimum interval between consecutive requests so that long
//! catalog walks trip the server's 429 responses less often.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Minimum-interval rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum time between two requests; `None` disables pacing
    min_interval: Option<Duration>,
    /// Last request timestamp
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a rate limiter allowing `requests_per_second`
    ///
    /// Zero, negative, non-finite, or so small that the interval overflows
    /// a `Duration`: pacing is disabled.
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = (requests_per_second.is_finite() && requests_per_second > 0.0)
            .then(|| Duration::try_from_secs_f64(1.0 / requests_per_second).ok())
            .flatten();

        if min_interval.is_none() && requests_per_second != 0.0 {
            tracing::warn!(
                requests_per_second = requests_per_second,
                "Unusable request rate, pacing disabled"
            );
        }

        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until a request can be made
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let (Some(min_interval), Some(last)) = (self.min_interval, *last_request) {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait_time = min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Pacing: waiting before next request"
                );
                sleep(wait_time).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}
