//! Internal scrape service
//!
//! Exposes `POST /scrape-doctor` behind HTTP Basic Auth so the chat service can
//! populate the document store on a cache miss.

use std::sync::Arc;

use crate::pipeline::ScrapePipeline;

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
  pub pipeline: Arc<ScrapePipeline>,
  /// Shared secret expected as the Basic Auth password
  pub auth_token: Arc<str>,
}

impl AppState {
  pub fn new(pipeline: ScrapePipeline, auth_token: impl Into<Arc<str>>) -> Self {
    Self { pipeline: Arc::new(pipeline), auth_token: auth_token.into() }
  }
}
