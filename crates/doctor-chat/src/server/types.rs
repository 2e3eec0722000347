//! Request and response bodies of the chat API

use serde::{Deserialize, Serialize};
use serde_json::Number;

// Ask Endpoint
// ============

/// Body of `POST /ask`; every field is required
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
  #[serde(default)]
  pub question: Option<String>,
  #[serde(default)]
  pub doctorusername: Option<String>,
  #[serde(default)]
  pub usernumber: Option<UserNumber>,
}

impl AskRequest {
  /// Names of required fields that are absent or null, in request order
  pub fn missing_fields(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.question.is_none() {
      missing.push("question");
    }
    if self.doctorusername.is_none() {
      missing.push("doctorusername");
    }
    if self.usernumber.is_none() {
      missing.push("usernumber");
    }
    missing
  }
}

/// User identifiers arrive either as strings or as bare numbers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserNumber {
  Text(String),
  Number(Number),
}

impl std::fmt::Display for UserNumber {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Text(text) => f.write_str(text),
      Self::Number(number) => write!(f, "{number}"),
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
  /// Assistant reply
  pub answer: String,
  /// Doctor username the question was about
  pub doctor: String,
  /// Caller identifier, echoed as a string
  pub user: String,
  /// RFC 3339 time the answer was produced
  pub timestamp: String,
  /// Messages in the session after this exchange, system message excluded
  pub conversation_length: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub details: Option<String>,
}

impl ErrorResponse {
  pub fn new(error: impl Into<String>) -> Self {
    Self { error: error.into(), details: None }
  }

  pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
    Self { error: error.into(), details: Some(details.into()) }
  }
}

// Status Endpoint
// ===============

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub cached_documents: usize,
  pub sessions: usize,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_user_number_accepts_strings_and_numbers() {
    let request: AskRequest =
      serde_json::from_value(json!({ "question": "q", "doctorusername": "dr-x", "usernumber": 9876543210u64 })).unwrap();
    assert_eq!(request.usernumber.unwrap().to_string(), "9876543210");

    let request: AskRequest = serde_json::from_value(json!({ "usernumber": "42" })).unwrap();
    assert_eq!(request.usernumber, Some(UserNumber::Text("42".to_string())));
  }

  #[test]
  fn test_missing_fields_are_listed_in_order() {
    let request: AskRequest = serde_json::from_value(json!({ "doctorusername": "dr-x", "question": null })).unwrap();
    assert_eq!(request.missing_fields(), vec!["question", "usernumber"]);
  }
}
