//! Volume Service
//!
//! Runs the refresh cycle (fetch, record, average, alert) and assembles
//! per-pair snapshots for the query surface.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracker_core::{CurrencyPair, PairSnapshot, SampleSource, TrackerError, TrackerResult};

use crate::anomaly::{self, VolumeAlert};
use crate::notifier::{Notifier, ALERT_SUBJECT};
use crate::volume_stats;
use crate::volume_store::VolumeStore;

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub samples_recorded: usize,
    pub alerts: Vec<VolumeAlert>,
    pub notifications_sent: usize,
}

/// Trade volume engine
pub struct VolumeService {
    store: Arc<dyn VolumeStore>,
    source: Arc<dyn SampleSource>,
    notifier: Arc<dyn Notifier>,
    tracked_pairs: Vec<CurrencyPair>,
    notify_emails: Vec<String>,
}

impl VolumeService {
    /// Create a new VolumeService
    ///
    /// `tracked_pairs` is fixed for the lifetime of the service and must not
    /// be empty. Duplicates are dropped.
    pub fn new(
        store: Arc<dyn VolumeStore>,
        source: Arc<dyn SampleSource>,
        notifier: Arc<dyn Notifier>,
        tracked_pairs: Vec<CurrencyPair>,
        notify_emails: Vec<String>,
    ) -> TrackerResult<Self> {
        let mut pairs: Vec<CurrencyPair> = Vec::with_capacity(tracked_pairs.len());
        for pair in tracked_pairs {
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }

        if pairs.is_empty() {
            return Err(TrackerError::config("at least one currency pair must be tracked"));
        }

        Ok(Self {
            store,
            source,
            notifier,
            tracked_pairs: pairs,
            notify_emails,
        })
    }

    pub fn tracked_pairs(&self) -> &[CurrencyPair] {
        &self.tracked_pairs
    }

    /// Load another batch of trade volumes, record them and send alerts for
    /// notable spikes
    ///
    /// Averages are read after the batch is recorded, so each new sample is
    /// part of its own trailing average. Nothing is written or sent if the
    /// source fails.
    pub async fn refresh(&self) -> TrackerResult<RefreshSummary> {
        let fetched = self.source.fetch_samples(&self.tracked_pairs).await?;
        let fetched_count = fetched.len();
        let samples: Vec<_> = fetched
            .into_iter()
            .filter(|sample| self.tracked_pairs.contains(&sample.pair))
            .collect();
        if samples.len() < fetched_count {
            warn!(
                "Dropped {} samples for untracked pairs",
                fetched_count - samples.len()
            );
        }
        debug!("Fetched {} volume samples", samples.len());

        self.store.append(&samples).await?;

        let averages = self.store.hourly_averages().await?;
        let averages = volume_stats::averages_by_pair(&averages);

        let alerts = anomaly::find_spikes(&samples, &averages);
        let mut notifications_sent = 0;
        for alert in &alerts {
            warn!(
                "Volume spike on {}: {} against hourly average {}",
                alert.pair, alert.volume, alert.avg_volume
            );
            let body = alert.message();
            for email in &self.notify_emails {
                self.notifier.notify(email, ALERT_SUBJECT, &body).await;
                notifications_sent += 1;
            }
        }

        info!(
            "Refresh complete: {} samples recorded, {} spikes, {} notifications",
            samples.len(),
            alerts.len(),
            notifications_sent
        );

        Ok(RefreshSummary {
            samples_recorded: samples.len(),
            alerts,
            notifications_sent,
        })
    }

    /// Get the last 24 hours of trade volume for `pair` together with its
    /// volatility rank among the tracked pairs with data
    ///
    /// Ranks only cover the tracked pairs, so a rank never exceeds
    /// `total_tracked_pairs` even if the store holds rows for other pairs.
    pub async fn snapshot(&self, pair: CurrencyPair) -> TrackerResult<PairSnapshot> {
        if !self.tracked_pairs.contains(&pair) {
            debug!("Snapshot requested for untracked pair {}", pair);
            return Err(TrackerError::PairDataUnavailable(pair));
        }

        let ranks = self.store.volatility_ranks().await?;
        let ranks = volume_stats::restrict_ranks(ranks, &self.tracked_pairs);

        let rank = ranks
            .iter()
            .find(|r| r.pair == pair)
            .map(|r| r.rank)
            .ok_or_else(|| {
                debug!(
                    "No rank for {} among {} ranked pairs",
                    pair,
                    ranks.len()
                );
                TrackerError::PairDataUnavailable(pair)
            })?;

        let history = self.store.history(pair).await?;

        Ok(PairSnapshot {
            pair,
            history,
            rank,
            total_tracked_pairs: self.tracked_pairs.len(),
        })
    }
}
