//! Retry policy for rate-limited (HTTP 429) responses.

use shared::config::{CatalogConfig, RetryConfig};
use std::time::Duration;

/// How long to wait after a 429 and how many times to try again
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub delay: Duration,
    /// Factor applied to the delay after each consecutive 429
    pub backoff_multiplier: f64,
    /// Ceiling for a single delay
    pub max_delay: Duration,
    /// Maximum consecutive retries; `None` retries until the server relents
    pub max_retries: Option<u32>,
}

impl RetryPolicy {
    /// Policy for single-item lookups
    pub fn for_lookups(config: &RetryConfig) -> Self {
        Self::from_config(config, config.lookup_delay_ms)
    }

    /// Policy for paging through a catalog
    pub fn for_catalog(config: &RetryConfig, catalog: &CatalogConfig) -> Self {
        Self::from_config(config, catalog.retry_delay_ms)
    }

    fn from_config(config: &RetryConfig, delay_ms: u64) -> Self {
        let delay = Duration::from_millis(delay_ms);
        Self {
            delay,
            backoff_multiplier: config.backoff_multiplier.max(1.0),
            max_delay: Duration::from_millis(config.max_delay_ms).max(delay),
            max_retries: config.max_retries,
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let secs = self.delay.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs)
    }

    /// Whether another retry is allowed after `retries` have been spent
    pub fn allows_retry(&self, retries: u32) -> bool {
        self.max_retries.map_or(true, |max| retries < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(delay: Duration, max_retries: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            delay,
            backoff_multiplier: 1.0,
            max_delay: delay,
            max_retries,
        }
    }

    #[test]
    fn test_fixed_policy_never_grows() {
        let policy = fixed(Duration::from_secs(10), None);
        assert_eq!(policy.delay_for(0), Duration::from_secs(10));
        assert_eq!(policy.delay_for(25), Duration::from_secs(10));
        assert!(policy.allows_retry(u32::MAX - 1));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            delay: Duration::from_millis(100),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(500),
            max_retries: None,
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1000), Duration::from_millis(500));
    }

    #[test]
    fn test_max_retries() {
        let policy = fixed(Duration::from_millis(1), Some(2));
        assert!(policy.allows_retry(0));
        assert!(policy.allows_retry(1));
        assert!(!policy.allows_retry(2));
    }

    #[test]
    fn test_from_config_uses_per_site_delay() {
        let config = shared::Config::default();
        let lookups = RetryPolicy::for_lookups(&config.bgg.retry);
        let designers = RetryPolicy::for_catalog(&config.bgg.retry, &config.bgg.designer_catalog);
        let publishers =
            RetryPolicy::for_catalog(&config.bgg.retry, &config.bgg.publisher_catalog);

        assert_eq!(lookups.delay, Duration::from_secs(1));
        assert_eq!(designers.delay, Duration::from_secs(30));
        assert_eq!(publishers.delay, Duration::from_secs(10));
        assert_eq!(designers.max_retries, None);
    }
}
