//! REST handlers: poll creation and lookup, plus health/status.

use super::AppState;
use crate::polls::{Poll, StoreError};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Creation payload. `options` must be an array of strings; the Json
/// extractor rejects anything else before the store is consulted.
#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// REST error surface. Serialized as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// POST /api/polls
pub async fn create_poll(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>), ApiError> {
    let poll = state.store.create_poll(&req.question, &req.options)?;
    info!(poll_id = %poll.id, options = poll.options.len(), "poll created");
    Ok((StatusCode::CREATED, Json(poll)))
}

/// GET /api/polls/{id}
pub async fn get_poll(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Poll>, ApiError> {
    Ok(Json(state.store.get_poll(&id)?))
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let live = state.live.stats().await;
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSeconds": state.start_time.elapsed().as_secs(),
        "polls": state.store.poll_count(),
        "connections": live.connections,
        "rooms": live.rooms,
    }))
}
