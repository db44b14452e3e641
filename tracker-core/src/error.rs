//! Error types for the tracker

use thiserror::Error;

use crate::pair::CurrencyPair;

/// Tracker-wide error type
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The upstream sample source could not deliver a batch
    #[error("Sample source unavailable: {0}")]
    SourceUnavailable(String),

    /// An append or aggregate query against the store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// No samples for the pair in the ranking window. Covers both a pair that
    /// was never ingested and one whose ingestion has stalled.
    #[error("No volume data available for {0} in the last 24 hours")]
    PairDataUnavailable(CurrencyPair),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        TrackerError::SourceUnavailable(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        TrackerError::StoreUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        TrackerError::Config(msg.into())
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
