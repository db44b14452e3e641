//! Webhook for externally scheduled refreshes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{tracker_error_response, ErrorResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RecordTradeVolumeResponse {
    pub success: bool,
    pub samples_recorded: usize,
    pub alerts_sent: usize,
}

/// Create webhook routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/record_trade_volume", get(record_trade_volume))
}

/// Run one refresh cycle
async fn record_trade_volume(State(state): State<AppState>) -> Response {
    match state.refresh_scheduler.run_once().await {
        Ok(Some(summary)) => (
            StatusCode::OK,
            Json(RecordTradeVolumeResponse {
                success: true,
                samples_recorded: summary.samples_recorded,
                alerts_sent: summary.notifications_sent,
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "refresh_in_progress",
                "A refresh cycle is already running",
            )),
        )
            .into_response(),
        Err(e) => tracker_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, get, json_body, StaticSource};
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use tracker_core::{CurrencyPair, VolumeSample};
    use tracker_services::SqliteVolumeStore;

    #[tokio::test]
    async fn test_record_trade_volume() {
        let store = Arc::new(SqliteVolumeStore::new_in_memory().unwrap());
        let samples = CurrencyPair::ALL
            .iter()
            .map(|pair| VolumeSample::new(*pair, Utc::now(), 50.0))
            .collect();
        let app = app(store.clone(), StaticSource { samples: Some(samples) });

        let response = get(app, "/webhook/record_trade_volume").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["samples_recorded"], 3);
        assert_eq!(body["alerts_sent"], 0);
        assert_eq!(store.sample_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_source_failure_is_bad_gateway() {
        let store = Arc::new(SqliteVolumeStore::new_in_memory().unwrap());
        let app = app(store.clone(), StaticSource { samples: None });

        let response = get(app, "/webhook/record_trade_volume").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["code"], "source_unavailable");
        assert_eq!(store.sample_count().unwrap(), 0);
    }
}
