use axum::{extract::State, response::Json};

use crate::server::types::StatusResponse;
use crate::server::AppState;

/// GET /status - Health check with cache and session counts
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
  Json(StatusResponse {
    status: "healthy".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    cached_documents: state.cache.len().await,
    sessions: state.sessions.len().await,
  })
}
