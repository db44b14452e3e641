//! Volume Statistics
//!
//! Rolling windows and the pure computations behind the volatility ranking.
//! Standard deviation is the sample deviation (n - 1 denominator); a pair
//! with a single sample in the window has a deviation of zero.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use tracker_core::{CurrencyPair, PairAverage, PairRank};

/// Rolling window anchored to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Window for the trailing volume average used by spike detection
    OneHour,
    /// Window for volatility ranking and snapshot history
    TwentyFourHours,
}

impl Window {
    /// Get the duration for this window
    pub fn duration(&self) -> Duration {
        match self {
            Window::OneHour => Duration::hours(1),
            Window::TwentyFourHours => Duration::hours(24),
        }
    }

    /// Get the start of this window when anchored at `now`
    pub fn start_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }
}

/// Sample standard deviation of `values`
///
/// Returns `None` for an empty slice so that "no data" never reads as zero.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        1 => Some(0.0),
        n => {
            let mean = values.iter().sum::<f64>() / n as f64;
            let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((squared / (n - 1) as f64).sqrt())
        }
    }
}

/// Rank pairs by the standard deviation of their volumes
///
/// Ordering is deviation descending, then pair symbol descending, so ranks
/// are contiguous from 1 and never shared. Pairs without volumes are left out.
pub fn rank_by_volatility(volumes: BTreeMap<CurrencyPair, Vec<f64>>) -> Vec<PairRank> {
    let mut deviations: Vec<(CurrencyPair, f64)> = volumes
        .into_iter()
        .filter_map(|(pair, values)| sample_std_dev(&values).map(|std_dev| (pair, std_dev)))
        .collect();

    deviations.sort_by(|(pair_a, dev_a), (pair_b, dev_b)| {
        dev_b
            .total_cmp(dev_a)
            .then_with(|| pair_b.as_str().cmp(pair_a.as_str()))
    });

    deviations
        .into_iter()
        .enumerate()
        .map(|(index, (pair, std_dev_volume))| PairRank {
            pair,
            std_dev_volume,
            rank: index as u32 + 1,
        })
        .collect()
}

/// Keep only ranks for `tracked` pairs and renumber them from 1
///
/// Relative order is preserved, so the result is the same as ranking the
/// tracked pairs alone.
pub fn restrict_ranks(ranks: Vec<PairRank>, tracked: &[CurrencyPair]) -> Vec<PairRank> {
    ranks
        .into_iter()
        .filter(|rank| tracked.contains(&rank.pair))
        .enumerate()
        .map(|(index, rank)| PairRank {
            rank: index as u32 + 1,
            ..rank
        })
        .collect()
}

/// Index hourly averages by pair for lookup during spike evaluation
pub fn averages_by_pair(averages: &[PairAverage]) -> HashMap<CurrencyPair, f64> {
    averages
        .iter()
        .map(|average| (average.pair, average.avg_volume))
        .collect()
}
