//! Volume history endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracker_core::{CurrencyPair, PairSnapshot};

use super::{tracker_error_response, ErrorResponse};
use crate::AppState;

/// Query parameters for volume history
#[derive(Debug, Deserialize)]
pub struct VolumeHistoryQuery {
    /// Exchange symbol, e.g. `XEM/BTC`
    pub currency_pair: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub time: DateTime<Utc>,
    pub volume: f64,
}

/// Response for volume history
#[derive(Debug, Serialize)]
pub struct HistoryApiResponse {
    pub currency_pair: CurrencyPair,
    pub history: Vec<HistoryItem>,
    /// Position among tracked pairs by 24h volume standard deviation
    pub rank: u32,
    pub total_tracked_currency_pairs: usize,
}

impl From<PairSnapshot> for HistoryApiResponse {
    fn from(snapshot: PairSnapshot) -> Self {
        Self {
            currency_pair: snapshot.pair,
            history: snapshot
                .history
                .into_iter()
                .map(|sample| HistoryItem {
                    time: sample.observed_at,
                    volume: sample.volume,
                })
                .collect(),
            rank: snapshot.rank,
            total_tracked_currency_pairs: snapshot.total_tracked_pairs,
        }
    }
}

/// Create volume routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/volume_history", get(volume_history))
}

/// Get the last 24 hours of volume and the volatility rank of a pair
async fn volume_history(
    State(state): State<AppState>,
    Query(params): Query<VolumeHistoryQuery>,
) -> Response {
    let pair: CurrencyPair = match params.currency_pair.parse() {
        Ok(pair) => pair,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("unknown_currency_pair", e)),
            )
                .into_response();
        }
    };

    match state.volume_service.snapshot(pair).await {
        Ok(snapshot) => {
            info!(
                "Returning {} history points for {} (rank {}/{})",
                snapshot.history.len(),
                pair,
                snapshot.rank,
                snapshot.total_tracked_pairs
            );
            (StatusCode::OK, Json(HistoryApiResponse::from(snapshot))).into_response()
        }
        Err(e) => tracker_error_response(e),
    }
}
