//! Scrape endpoint handler

use axum::{
  extract::{rejection::JsonRejection, Extension, State},
  http::StatusCode,
  response::Json,
};
use tracing::{error, info, warn};

use crate::doctor::DoctorId;
use crate::error::ScrapeError;
use crate::server::middleware::RequestContext;
use crate::server::types::{ErrorResponse, ScrapeRequest, ScrapeResponse};
use crate::server::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /scrape-doctor - Scrape a profile and store its document
pub async fn scrape_doctor(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
  let request = payload.map(|Json(request)| request).unwrap_or_default();

  let raw = request.doctor_username.as_deref().map(str::trim).unwrap_or_default();
  if raw.is_empty() {
    return Err(bad_request("doctor_username is required"));
  }

  let doctor = DoctorId::parse(raw).map_err(|e| bad_request(&e.to_string()))?;
  info!(request_id = %context.request_id, doctor = %doctor, "Scrape requested");

  match state.pipeline.scrape(&doctor).await {
    Ok(outcome) => {
      let filename = outcome.filename();
      Ok(Json(ScrapeResponse {
        success: true,
        message: format!("Data scraped and saved to {filename}"),
        filename,
      }))
    }
    Err(e @ ScrapeError::Fetch { .. }) => {
      warn!(request_id = %context.request_id, doctor = %doctor, error = %e, "Profile fetch failed");
      Err((StatusCode::NOT_FOUND, Json(ErrorResponse::new("Failed to fetch the page"))))
    }
    Err(e) => {
      error!(request_id = %context.request_id, doctor = %doctor, error = %e, "Scrape failed");
      Err((StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new("Failed to save data"))))
    }
  }
}

fn bad_request(message: &str) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}
