//! Health check endpoints

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tracker_core::CurrencyPair;

use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    tracked_pairs: Vec<CurrencyPair>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        tracked_pairs: state.volume_service.tracked_pairs().to_vec(),
    })
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
