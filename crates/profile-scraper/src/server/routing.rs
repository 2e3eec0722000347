//! Axum router for the scrape service

use axum::{
  middleware::{from_fn, from_fn_with_state},
  routing::{get, post},
  Router,
};

use crate::server::handlers::{scrape, status};
use crate::server::middleware::{request_context_middleware, require_basic_auth};
use crate::server::AppState;

/// Create the service router. Only the scrape endpoint requires credentials.
pub fn create_router(state: AppState) -> Router {
  let protected = Router::new()
    .route("/scrape-doctor", post(scrape::scrape_doctor))
    .route_layer(from_fn_with_state(state.clone(), require_basic_auth));

  Router::new()
    .route("/status", get(status::status))
    .merge(protected)
    .layer(from_fn(request_context_middleware))
    .with_state(state)
}
