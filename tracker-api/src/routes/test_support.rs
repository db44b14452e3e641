//! Fixtures for route tests

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response, Router};
use std::sync::Arc;
use tower::ServiceExt;
use tracker_core::{CurrencyPair, SampleSource, TrackerError, TrackerResult, VolumeSample};
use tracker_services::{LoggingNotifier, RefreshSchedulerConfig, SqliteVolumeStore, VolumeService};

use crate::{router, AppState};

/// Source returning a fixed batch, or failing when `samples` is `None`
pub struct StaticSource {
    pub samples: Option<Vec<VolumeSample>>,
}

#[async_trait]
impl SampleSource for StaticSource {
    async fn fetch_samples(&self, _pairs: &[CurrencyPair]) -> TrackerResult<Vec<VolumeSample>> {
        self.samples
            .clone()
            .ok_or_else(|| TrackerError::source_unavailable("status 503"))
    }
}

pub fn app(store: Arc<SqliteVolumeStore>, source: StaticSource) -> Router {
    let service = VolumeService::new(
        store,
        Arc::new(source),
        Arc::new(LoggingNotifier),
        CurrencyPair::ALL.to_vec(),
        vec!["example@local".to_string()],
    )
    .unwrap();
    router(AppState::new(Arc::new(service), RefreshSchedulerConfig::default()))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
