//! Run a single volume refresh and exit
//!
//! Meant for cron-style schedulers; the exit code reflects whether the cycle
//! succeeded.

use tracing::info;
use tracker_api::config::Settings;
use tracker_api::{build_volume_service, init_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_environment();

    let settings = Settings::from_env()?;
    let volume_service = build_volume_service(&settings)?;

    let summary = volume_service.refresh().await?;
    info!(
        "Recorded {} samples, sent {} notifications",
        summary.samples_recorded, summary.notifications_sent
    );

    Ok(())
}
