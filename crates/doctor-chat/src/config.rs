//! Chat service configuration
//!
//! Plain settings structs with the service defaults. The server binary fills
//! them from flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

/// Settings for the conversation store, doctor cache and background sweeps
#[derive(Debug, Clone)]
pub struct ChatConfig {
  /// Directory holding the scraped `<doctor>.txt` documents
  pub data_dir: PathBuf,
  /// Idle time after which a conversation is evicted
  pub cleanup_interval: Duration,
  /// Maximum messages kept per conversation, system message included
  pub max_conversation_length: usize,
  /// Age at which the in-memory document cache is flushed
  pub cache_refresh_interval: Duration,
  /// How often the cache flush check runs
  pub cache_sweep_interval: Duration,
  /// How often idle conversations are swept
  pub session_sweep_interval: Duration,
  /// Profile URL prefix used for booking links in the system prompt
  pub booking_base_url: String,
}

impl Default for ChatConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("doctorsData"),
      cleanup_interval: Duration::from_secs(600),
      max_conversation_length: 50,
      cache_refresh_interval: Duration::from_secs(3600),
      cache_sweep_interval: Duration::from_secs(3600),
      session_sweep_interval: Duration::from_secs(60),
      booking_base_url: "https://www.linqmd.com/doctor-profile".to_string(),
    }
  }
}

/// Where and how to reach the scrape service
#[derive(Debug, Clone)]
pub struct ScrapeTriggerConfig {
  pub url: String,
  /// Basic Auth password; the username is left empty
  pub secret: String,
  pub timeout_secs: u64,
}

impl Default for ScrapeTriggerConfig {
  fn default() -> Self {
    Self { url: "http://localhost:5001/scrape-doctor".to_string(), secret: String::new(), timeout_secs: 30 }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LlmProvider {
  /// OpenAI-compatible `/chat/completions`
  #[default]
  #[value(name = "openai")]
  OpenAi,
  /// Ollama `/api/chat`
  Ollama,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
  pub provider: LlmProvider,
  /// Overrides the provider's default endpoint
  pub base_url: Option<String>,
  /// Overrides the provider's default model
  pub model: Option<String>,
  pub api_key: Option<String>,
  pub timeout_secs: u64,
  pub max_tokens: u32,
  pub temperature: f32,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      provider: LlmProvider::OpenAi,
      base_url: None,
      model: None,
      api_key: None,
      timeout_secs: 30,
      max_tokens: 512,
      temperature: 0.6,
    }
  }
}
