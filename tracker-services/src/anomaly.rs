//! Spike detection for freshly fetched volume samples

use serde::Serialize;
use std::collections::HashMap;
use tracker_core::{CurrencyPair, VolumeSample};

/// A sample must reach this multiple of its trailing average to be notable
pub const SPIKE_MULTIPLIER: f64 = 3.0;

/// Whether `new_volume` is a spike against `avg_volume`
///
/// A zero or negative average never counts, otherwise every sample of a pair
/// without history would alert. The boundary is inclusive.
pub fn is_notable_spike(new_volume: f64, avg_volume: f64) -> bool {
    avg_volume > 0.0 && new_volume >= SPIKE_MULTIPLIER * avg_volume
}

/// A sample that crossed the spike threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeAlert {
    pub pair: CurrencyPair,
    pub volume: f64,
    pub avg_volume: f64,
}

impl VolumeAlert {
    /// Notification body
    pub fn message(&self) -> String {
        format!("{} is trading at {}", self.pair, self.volume)
    }
}

/// Evaluate each sample against its pair's trailing average
///
/// Samples whose pair has no average are skipped.
pub fn find_spikes(
    samples: &[VolumeSample],
    averages: &HashMap<CurrencyPair, f64>,
) -> Vec<VolumeAlert> {
    samples
        .iter()
        .filter_map(|sample| {
            let avg_volume = *averages.get(&sample.pair)?;
            is_notable_spike(sample.volume, avg_volume).then(|| VolumeAlert {
                pair: sample.pair,
                volume: sample.volume,
                avg_volume,
            })
        })
        .collect()
}
