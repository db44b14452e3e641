//! CryptoTracker API Server
//!
//! Serves volume history snapshots and runs the periodic volume refresh.

use std::net::SocketAddr;
use tracing::info;
use tracker_api::config::Settings;
use tracker_api::{build_volume_service, init_environment, router, AppState};
use tracker_services::RefreshSchedulerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_environment();

    info!("Starting CryptoTracker API");

    let settings = Settings::from_env()?;
    let volume_service = build_volume_service(&settings)?;

    let state = AppState::new(
        volume_service,
        RefreshSchedulerConfig {
            interval_secs: settings.refresh_interval_secs,
        },
    );

    // Start the refresh loop in background
    if settings.enable_scheduler {
        let scheduler = state.refresh_scheduler.clone();
        tokio::spawn(async move {
            scheduler.start().await;
        });
    } else {
        info!("Refresh scheduler disabled - relying on /webhook/record_trade_volume");
    }

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server_port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
