//! Refresh Scheduler
//!
//! Background service that runs the volume refresh cycle on a fixed
//! interval. Scheduled ticks and on-demand refreshes share one guard, so at
//! most one cycle is in flight at a time.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tracker_core::TrackerResult;

use crate::volume_service::{RefreshSummary, VolumeService};

/// Configuration for the refresh scheduler
#[derive(Debug, Clone)]
pub struct RefreshSchedulerConfig {
    /// How often to refresh (in seconds)
    pub interval_secs: u64,
}

impl Default for RefreshSchedulerConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Single-flight driver for [`VolumeService::refresh`]
pub struct RefreshScheduler {
    service: Arc<VolumeService>,
    config: RefreshSchedulerConfig,
    in_flight: Mutex<()>,
}

impl RefreshScheduler {
    pub fn new(service: Arc<VolumeService>, config: RefreshSchedulerConfig) -> Self {
        Self {
            service,
            config,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one refresh unless another is already running
    ///
    /// Returns `Ok(None)` when the cycle was skipped.
    pub async fn run_once(&self) -> TrackerResult<Option<RefreshSummary>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Refresh already in progress, skipping");
            return Ok(None);
        };

        self.service.refresh().await.map(Some)
    }

    /// Start the background refresh loop
    ///
    /// This runs indefinitely. A failed cycle is logged and retried on the
    /// next tick; ticks missed while a cycle runs long are dropped.
    pub async fn start(self: Arc<Self>) {
        info!(
            "Starting refresh scheduler with {}s interval",
            self.config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(self.config.interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.run_once().await {
                Ok(Some(summary)) => debug!(
                    "Scheduled refresh recorded {} samples",
                    summary.samples_recorded
                ),
                Ok(None) => warn!("Scheduled refresh skipped: previous cycle still running"),
                Err(e) => error!("Scheduled refresh failed: {}", e),
            }
        }
    }
}
