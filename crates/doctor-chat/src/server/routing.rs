//! Axum router for the chat API

use axum::{
  middleware::from_fn,
  routing::{get, post},
  Router,
};
use profile_scraper::server::middleware::request_context_middleware;

use crate::server::handlers::{ask, status};
use crate::server::AppState;

pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/ask", post(ask::ask_question))
    .route("/status", get(status::status))
    .layer(from_fn(request_context_middleware))
    .with_state(state)
}
