//! API route definitions

mod health;
#[cfg(test)]
mod test_support;
mod volume;
mod webhook;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tracing::error;
use tracker_core::TrackerError;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(volume::routes())
        .merge(health::routes())
}

/// Create webhook routes (triggered by external schedulers)
pub fn webhook_routes() -> Router<AppState> {
    webhook::routes()
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl ErrorResponse {
    fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Map an engine error onto an HTTP response
fn tracker_error_response(err: TrackerError) -> Response {
    let (status, code) = match &err {
        TrackerError::PairDataUnavailable(_) => (StatusCode::NOT_FOUND, "pair_data_unavailable"),
        TrackerError::SourceUnavailable(_) => (StatusCode::BAD_GATEWAY, "source_unavailable"),
        TrackerError::StoreUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable"),
        TrackerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config"),
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    }

    (status, Json(ErrorResponse::new(code, err.to_string()))).into_response()
}
