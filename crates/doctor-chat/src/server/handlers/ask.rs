//! Question endpoint handler

use axum::{
  extract::{rejection::JsonRejection, Extension, State},
  http::StatusCode,
  response::Json,
};
use chrono::Utc;
use profile_scraper::server::middleware::RequestContext;
use profile_scraper::DoctorId;
use serde_json::Value;
use tracing::{error, info};

use crate::error::ChatError;
use crate::server::types::{AskRequest, AskResponse, ErrorResponse};
use crate::server::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /ask - Answer a question about a doctor within the user's conversation
pub async fn ask_question(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
  let (question, doctor, user) = validate(payload).map_err(|e| error_response(&e))?;
  info!(request_id = %context.request_id, doctor = %doctor, user = %user, "Question received");

  match state.sessions.append_exchange(&doctor, &user, &question).await {
    Ok(exchange) => Ok(Json(AskResponse {
      answer: exchange.answer,
      doctor: doctor.to_string(),
      user,
      timestamp: Utc::now().to_rfc3339(),
      conversation_length: exchange.conversation_length,
    })),
    Err(e) => {
      error!(request_id = %context.request_id, doctor = %doctor, error = %e, "Error processing request");
      Err(error_response(&e))
    }
  }
}

/// Check the body and return the trimmed question, doctor and user
fn validate(payload: Result<Json<Value>, JsonRejection>) -> Result<(String, DoctorId, String), ChatError> {
  let body = match payload {
    Ok(Json(Value::Object(fields))) if !fields.is_empty() => Value::Object(fields),
    _ => return Err(ChatError::Validation("No JSON data provided".to_string())),
  };

  let request: AskRequest =
    serde_json::from_value(body).map_err(|e| ChatError::Validation(format!("Invalid request body: {e}")))?;

  let missing = request.missing_fields();
  if !missing.is_empty() {
    return Err(ChatError::Validation(format!("Missing required fields: {}", missing.join(", "))));
  }

  let (Some(question), Some(doctor), Some(user)) = (request.question, request.doctorusername, request.usernumber)
  else {
    return Err(ChatError::Validation("Missing required fields".to_string()));
  };

  let question = question.trim();
  if question.is_empty() {
    return Err(ChatError::Validation("Question cannot be empty".to_string()));
  }

  let doctor = doctor.trim();
  if doctor.is_empty() {
    return Err(ChatError::Validation("doctorusername cannot be empty".to_string()));
  }
  let doctor = DoctorId::parse(doctor).map_err(|e| ChatError::Validation(e.to_string()))?;

  let user = user.to_string().trim().to_string();
  if user.is_empty() {
    return Err(ChatError::Validation("usernumber cannot be empty".to_string()));
  }

  Ok((question.to_string(), doctor, user))
}

fn error_response(e: &ChatError) -> ApiError {
  match e {
    ChatError::Validation(message) => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message.clone()))),
    ChatError::DoctorNotFound(_) => (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse::with_details(e.to_string(), "Doctor data not available and scraping failed")),
    ),
    _ => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(ErrorResponse::with_details("An error occurred processing your request", e.to_string())),
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn check(body: Value) -> Result<(String, DoctorId, String), ChatError> {
    validate(Ok(Json(body)))
  }

  fn validation_message(result: Result<(String, DoctorId, String), ChatError>) -> String {
    match result {
      Err(ChatError::Validation(message)) => message,
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn test_fields_are_trimmed() {
    let (question, doctor, user) =
      check(json!({ "question": "  Fees? ", "doctorusername": " dr-x ", "usernumber": 42 })).unwrap();

    assert_eq!(question, "Fees?");
    assert_eq!(doctor.as_str(), "dr-x");
    assert_eq!(user, "42");
  }

  #[test]
  fn test_empty_or_non_object_body() {
    assert_eq!(validation_message(check(json!({}))), "No JSON data provided");
    assert_eq!(validation_message(check(json!([1, 2]))), "No JSON data provided");
  }

  #[test]
  fn test_missing_fields_message() {
    let message = validation_message(check(json!({ "question": "Fees?" })));
    assert_eq!(message, "Missing required fields: doctorusername, usernumber");
  }

  #[test]
  fn test_blank_values_are_rejected() {
    let message = validation_message(check(json!({ "question": "   ", "doctorusername": "dr-x", "usernumber": "1" })));
    assert_eq!(message, "Question cannot be empty");

    let result = check(json!({ "question": "q", "doctorusername": "dr-x", "usernumber": "  " }));
    assert_eq!(validation_message(result), "usernumber cannot be empty");
  }

  #[test]
  fn test_unsafe_doctor_identifier_is_rejected() {
    let result = check(json!({ "question": "q", "doctorusername": "../secrets", "usernumber": "1" }));
    assert!(validation_message(result).contains("Invalid doctor identifier"));
  }

  #[test]
  fn test_error_status_mapping() {
    assert_eq!(error_response(&ChatError::Validation("bad".to_string())).0, StatusCode::BAD_REQUEST);

    let (status, Json(body)) = error_response(&ChatError::DoctorNotFound("dr-x".to_string()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error, "Unable to retrieve doctor data for: dr-x");
    assert_eq!(body.details.as_deref(), Some("Doctor data not available and scraping failed"));

    let (status, Json(body)) = error_response(&ChatError::Gateway("timeout".to_string()));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "An error occurred processing your request");
    assert_eq!(body.details.as_deref(), Some("Chat backend error: timeout"));
  }
}
