//! Business logic services for CryptoTracker
//!
//! This crate owns the volume time series and everything derived from it:
//! rolling averages, volatility ranking, spike detection and the refresh
//! cycle that ties a sample source, the store and the notifier together.

pub mod anomaly;
pub mod notifier;
pub mod refresh_scheduler;
pub mod volume_service;
pub mod volume_stats;
pub mod volume_store;

pub use anomaly::{is_notable_spike, VolumeAlert};
pub use notifier::{LoggingNotifier, Notifier, SendGridNotifier, ALERT_SUBJECT};
pub use refresh_scheduler::{RefreshScheduler, RefreshSchedulerConfig};
pub use volume_service::{RefreshSummary, VolumeService};
pub use volume_stats::Window;
pub use volume_store::{SqliteVolumeStore, VolumeStore, VolumeStoreError};
