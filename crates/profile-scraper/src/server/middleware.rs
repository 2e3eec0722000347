//! Request context and credential checks for the scrape service

use std::time::Instant;

use axum::{
  extract::{Request, State},
  http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
  middleware::Next,
  response::{IntoResponse, Json, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

use crate::server::types::ErrorResponse;
use crate::server::AppState;

/// Request metadata shared with handlers through request extensions
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }
}

/// Middleware to inject a [`RequestContext`] and log request start and completion
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());
  let start_time = Instant::now();
  info!(request_id = %context.request_id, method = %context.method, path = context.uri.path(), "Request started");

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  info!(
    request_id = %context.request_id,
    method = %context.method,
    path = context.uri.path(),
    status = response.status().as_u16(),
    duration_ms,
    "Request completed"
  );

  response
}

/// Reject requests whose Basic Auth password is not the shared secret.
/// The username is ignored.
pub async fn require_basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
  match basic_auth_password(request.headers()) {
    Some(password) if secret_matches(&password, &state.auth_token) => next.run(request).await,
    _ => {
      warn!(path = request.uri().path(), "Rejected request with missing or invalid credentials");
      (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new("Invalid or missing credentials"))).into_response()
    }
  }
}

/// Constant-time comparison against the shared secret
fn secret_matches(password: &str, secret: &str) -> bool {
  password.as_bytes().ct_eq(secret.as_bytes()).into()
}

/// Password part of a `Basic` authorization header, if well formed
fn basic_auth_password(headers: &HeaderMap) -> Option<String> {
  let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
  let (scheme, encoded) = value.split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return None;
  }

  let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
  let (_username, password) = decoded.split_once(':')?;
  Some(password.to_string())
}
