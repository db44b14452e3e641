//! Livecoin API payloads

use serde::Deserialize;

/// One entry of the `/exchange/ticker` response
///
/// Livecoin returns many more fields (last, high, low, vwap, ...); only the
/// ones the tracker needs are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerItem {
    pub symbol: String,
    pub volume: f64,
}
