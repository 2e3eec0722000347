//! Public chat API
//!
//! `POST /ask` answers one question within a (doctor, user) conversation;
//! `GET /status` reports cache and session counts.

use std::sync::Arc;

use crate::services::conversations::ConversationStore;
use crate::services::doctor_cache::DoctorCache;

pub mod handlers;
pub mod routing;
pub mod startup;
pub mod types;

#[derive(Clone)]
pub struct AppState {
  pub sessions: Arc<ConversationStore>,
  pub cache: Arc<DoctorCache>,
}

impl AppState {
  pub fn new(sessions: Arc<ConversationStore>) -> Self {
    let cache = Arc::clone(sessions.cache());
    Self { sessions, cache }
  }
}
