//! Error types for the Livecoin client

use thiserror::Error;
use tracker_core::TrackerError;

/// Errors that can occur while talking to Livecoin
#[derive(Debug, Error)]
pub enum LivecoinError {
    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Livecoin answered with a non-success status
    #[error("HTTP error: status {0}")]
    HttpError(u16),

    /// Failed to parse the ticker payload
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<LivecoinError> for TrackerError {
    fn from(err: LivecoinError) -> Self {
        TrackerError::source_unavailable(err.to_string())
    }
}
