//! Per-(doctor, user) conversation sessions
//!
//! The session map lock is held only for lookups, inserts and sweeps. Each
//! session has its own async mutex, held across the whole
//! append, model call, append-or-rollback sequence so exchanges on one
//! session never interleave while different sessions proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use profile_scraper::DoctorId;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::prompt::PromptBuilder;
use crate::services::doctor_cache::DoctorCache;
use crate::services::gateway::ChatGateway;
use crate::services::message::ChatMessage;

pub type SessionKey = (DoctorId, String);

type Transcript = Arc<Mutex<Vec<ChatMessage>>>;

struct Session {
  transcript: Transcript,
  last_access: Instant,
}

/// Outcome of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
  /// Assistant reply, as returned by the chat backend
  pub answer: String,
  /// Messages in the transcript, not counting the system message
  pub conversation_length: usize,
}

/// Chat sessions keyed by (doctor, user), seeded from the doctor's document
pub struct ConversationStore {
  cache: Arc<DoctorCache>,
  gateway: Arc<dyn ChatGateway>,
  prompts: PromptBuilder,
  /// Transcript bound, system message included
  max_length: usize,
  /// Inactivity after which a session may be swept
  idle_timeout: Duration,
  sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl ConversationStore {
  pub fn new(cache: Arc<DoctorCache>, gateway: Arc<dyn ChatGateway>, config: &ChatConfig) -> Self {
    Self {
      cache,
      gateway,
      prompts: PromptBuilder::new(config.booking_base_url.clone()),
      max_length: config.max_conversation_length.max(1),
      idle_timeout: config.cleanup_interval,
      sessions: Mutex::new(HashMap::new()),
    }
  }

  pub fn cache(&self) -> &Arc<DoctorCache> {
    &self.cache
  }

  /// Current transcript of a session, creating it if needed. Existing
  /// transcripts are trimmed first. `None` when the doctor's document cannot
  /// be resolved.
  pub async fn get_or_create(&self, doctor: &DoctorId, user: &str) -> Option<Vec<ChatMessage>> {
    let transcript = self.session(doctor, user).await?;
    let mut messages = transcript.lock().await;
    trim(&mut messages, self.max_length);
    Some(messages.clone())
  }

  /// Ask the model one question within a session. On a backend failure the
  /// user message is removed again and the error is returned.
  pub async fn append_exchange(&self, doctor: &DoctorId, user: &str, text: &str) -> Result<Exchange> {
    let transcript =
      self.session(doctor, user).await.ok_or_else(|| ChatError::DoctorNotFound(doctor.to_string()))?;

    let mut messages = transcript.lock().await;
    trim(&mut messages, self.max_length);
    messages.push(ChatMessage::User(text.to_string()));

    match self.gateway.respond(&messages).await {
      Ok(answer) => {
        messages.push(ChatMessage::Assistant(answer.clone()));
        let conversation_length = messages.len() - 1;
        drop(messages);

        self.touch(&(doctor.clone(), user.to_string())).await;
        debug!(doctor = %doctor, user, conversation_length, "Exchange completed");
        Ok(Exchange { answer, conversation_length })
      }
      Err(e) => {
        messages.pop();
        warn!(doctor = %doctor, user, error = %e, "Chat backend failed, exchange rolled back");
        Err(e)
      }
    }
  }

  /// Evict sessions idle for longer than the cleanup interval. Sessions with
  /// an exchange in progress are kept. Returns the number evicted.
  pub async fn sweep_idle(&self) -> usize {
    let mut sessions = self.sessions.lock().await;
    let before = sessions.len();

    sessions.retain(|_, session| {
      session.last_access.elapsed() <= self.idle_timeout || session.transcript.try_lock().is_err()
    });

    let evicted = before - sessions.len();
    if evicted > 0 {
      info!(evicted, remaining = sessions.len(), "Evicted idle conversations");
    }
    evicted
  }

  pub async fn len(&self) -> usize {
    self.sessions.lock().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }

  async fn session(&self, doctor: &DoctorId, user: &str) -> Option<Transcript> {
    let key = (doctor.clone(), user.to_string());
    if let Some(transcript) = self.touch(&key).await {
      return Some(transcript);
    }

    // resolved outside the map lock; a concurrent creator may win the insert
    let document = self.cache.get(doctor).await?;
    let system = ChatMessage::System(self.prompts.system_prompt(doctor, &document));

    let mut sessions = self.sessions.lock().await;
    let session = sessions.entry(key).or_insert_with(|| {
      info!(doctor = %doctor, user, "Created conversation");
      Session { transcript: Arc::new(Mutex::new(vec![system])), last_access: Instant::now() }
    });
    session.last_access = Instant::now();
    Some(Arc::clone(&session.transcript))
  }

  async fn touch(&self, key: &SessionKey) -> Option<Transcript> {
    let mut sessions = self.sessions.lock().await;
    let session = sessions.get_mut(key)?;
    session.last_access = Instant::now();
    Some(Arc::clone(&session.transcript))
  }
}

/// Keep the system message plus the newest `max_length - 1` messages
fn trim(messages: &mut Vec<ChatMessage>, max_length: usize) {
  if messages.len() > max_length {
    let excess = messages.len() - max_length;
    messages.drain(1..1 + excess);
  }
}
