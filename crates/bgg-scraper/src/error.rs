//! Error types for BoardGameGeek requests.

use reqwest::StatusCode;

/// Failure while talking to BoardGameGeek
///
/// A 429 never surfaces here unless a retry cap is configured; every other
/// variant is fatal for the call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { status: StatusCode, url: String },

    #[error("Still rate limited after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse markup: {0}")]
    Parse(String),
}

impl FetchError {
    /// HTTP status behind this error, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            FetchError::Request(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
