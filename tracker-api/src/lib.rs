//! CryptoTracker API
//!
//! Wiring shared by the HTTP server and the one-shot refresh job: settings,
//! service construction, logging and the router.

pub mod config;
pub mod routes;

use anyhow::Context;
use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracker_livecoin::LivecoinClient;
use tracker_services::{
    LoggingNotifier, Notifier, RefreshScheduler, RefreshSchedulerConfig, SendGridNotifier,
    SqliteVolumeStore, VolumeService,
};

use crate::config::{MailerSettings, Settings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub volume_service: Arc<VolumeService>,
    /// Shared with the background loop so webhook refreshes never overlap
    /// scheduled ones
    pub refresh_scheduler: Arc<RefreshScheduler>,
}

impl AppState {
    pub fn new(volume_service: Arc<VolumeService>, scheduler_config: RefreshSchedulerConfig) -> Self {
        let refresh_scheduler = Arc::new(RefreshScheduler::new(
            volume_service.clone(),
            scheduler_config,
        ));

        Self {
            volume_service,
            refresh_scheduler,
        }
    }
}

/// Load `.env.local` if present and initialise tracing
pub fn init_environment() {
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tracker_api=debug")),
        )
        .init();
}

/// Build the volume service from settings
pub fn build_volume_service(settings: &Settings) -> anyhow::Result<Arc<VolumeService>> {
    info!("Initializing volume store at: {}", settings.database_path);
    let store = SqliteVolumeStore::new(&settings.database_path)
        .context("Failed to initialize volume store")?;

    let source = LivecoinClient::with_base_url(&settings.livecoin_api_base)
        .context("Failed to create Livecoin client")?;

    let notifier: Arc<dyn Notifier> = match &settings.mailer {
        MailerSettings::SendGrid {
            api_key,
            from_email,
        } => {
            info!("Alerts will be sent through SendGrid from {}", from_email);
            Arc::new(
                SendGridNotifier::new(api_key.clone(), from_email.clone())
                    .context("Failed to create SendGrid client")?,
            )
        }
        MailerSettings::Logging => {
            info!("Alerts will be logged only (USE_REAL_MAILER not set)");
            Arc::new(LoggingNotifier)
        }
    };

    let service = VolumeService::new(
        Arc::new(store),
        Arc::new(source),
        notifier,
        settings.tracked_pairs.clone(),
        settings.notify_emails.clone(),
    )?;

    info!(
        "Tracking {} currency pairs, notifying {} recipients",
        service.tracked_pairs().len(),
        settings.notify_emails.len()
    );

    Ok(Arc::new(service))
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .nest("/webhook", routes::webhook_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
