//! Sample source abstraction

use async_trait::async_trait;

use crate::error::TrackerResult;
use crate::pair::CurrencyPair;
use crate::volume::VolumeSample;

/// Supplies the current trade volume for a set of currency pairs
///
/// Implementations return at most one sample per requested pair and fail
/// with [`TrackerError::SourceUnavailable`](crate::TrackerError) on any
/// non-success response from upstream.
#[async_trait]
pub trait SampleSource: Send + Sync {
    async fn fetch_samples(&self, pairs: &[CurrencyPair]) -> TrackerResult<Vec<VolumeSample>>;
}
