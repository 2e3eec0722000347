//! Request and response bodies of the scrape service

use serde::{Deserialize, Serialize};

/// Body of `POST /scrape-doctor`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScrapeRequest {
  #[serde(default)]
  pub doctor_username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeResponse {
  pub success: bool,
  pub message: String,
  pub filename: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub error: String,
}

impl ErrorResponse {
  pub fn new(error: impl Into<String>) -> Self {
    Self { error: error.into() }
  }
}

/// Response for `GET /status`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub data_dir: String,
}
