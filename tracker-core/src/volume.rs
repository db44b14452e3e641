//! Volume samples and the statistics derived from them

use crate::pair::CurrencyPair;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single trade volume observation for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    pub pair: CurrencyPair,

    /// When the sample was fetched from upstream
    pub observed_at: DateTime<Utc>,

    /// Trade volume reported by the exchange (non-negative)
    pub volume: f64,
}

impl VolumeSample {
    pub fn new(pair: CurrencyPair, observed_at: DateTime<Utc>, volume: f64) -> Self {
        Self {
            pair,
            observed_at,
            volume,
        }
    }
}

/// Average volume of a pair over the trailing hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairAverage {
    pub pair: CurrencyPair,
    pub avg_volume: f64,
}

/// Volatility of a pair over the trailing 24 hours and its position among
/// all pairs that have data in that window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairRank {
    pub pair: CurrencyPair,
    pub std_dev_volume: f64,
    /// 1-indexed, 1 being the most volatile
    pub rank: u32,
}

/// Point-in-time view of one pair: its 24h history and volatility rank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub pair: CurrencyPair,
    pub history: Vec<VolumeSample>,
    pub rank: u32,
    /// Size of the configured tracked set, regardless of how many pairs
    /// currently have data
    pub total_tracked_pairs: usize,
}
