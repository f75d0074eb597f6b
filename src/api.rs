use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::ingest::types::SourceResult;
use crate::store::{SnapshotReadError, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

/// Read-only routes over the snapshot store. Nothing here triggers a crawl.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/hot", get(latest_snapshot))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn latest_snapshot(State(state): State<AppState>) -> Result<Json<Vec<SourceResult>>, ApiError> {
    let snapshot = state.store.read_latest().await?;
    Ok(Json(snapshot.results))
}

pub struct ApiError(SnapshotReadError);

impl From<SnapshotReadError> for ApiError {
    fn from(e: SnapshotReadError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            SnapshotReadError::NotYetAvailable => {}
            other => tracing::warn!(error = %other, "snapshot unreadable"),
        }
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no data yet" })),
        )
            .into_response()
    }
}
