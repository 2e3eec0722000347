//! Doctor Chat Server
//!
//! Public HTTP API answering patient questions about a doctor from the
//! doctor's scraped profile.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use doctor_chat::server::startup::{build_state, start_server};
use doctor_chat::{ChatConfig, LlmConfig, LlmProvider, ScrapeTriggerConfig};
use profile_scraper::telemetry::{self, ErrorReporting};

#[derive(Parser)]
#[command(name = "doctor_chat_server")]
#[command(about = "Doctor Q&A chat API server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, env = "DOCTOR_CHAT_BIND", default_value = "0.0.0.0:5000")]
  bind: SocketAddr,

  /// Directory holding the scraped doctor documents
  #[arg(long, env = "DOCTOR_DATA_DIR", default_value = "doctorsData")]
  data_dir: PathBuf,

  /// Idle seconds after which a conversation is evicted
  #[arg(long, env = "CLEANUP_INTERVAL_SECS", default_value_t = 600)]
  cleanup_interval_secs: u64,

  /// Maximum messages kept per conversation, system message included
  #[arg(long, env = "MAX_CONVERSATION_LENGTH", default_value_t = 50)]
  max_conversation_length: usize,

  /// Seconds after which the doctor document cache is flushed
  #[arg(long, env = "CACHE_REFRESH_INTERVAL_SECS", default_value_t = 3600)]
  cache_refresh_interval_secs: u64,

  /// Seconds between cache flush checks
  #[arg(long, env = "CACHE_SWEEP_INTERVAL_SECS", default_value_t = 3600)]
  cache_sweep_interval_secs: u64,

  /// Seconds between idle conversation sweeps
  #[arg(long, env = "SESSION_SWEEP_INTERVAL_SECS", default_value_t = 60)]
  session_sweep_interval_secs: u64,

  /// Endpoint of the scrape service
  #[arg(long, env = "SCRAPER_URL", default_value = "http://localhost:5001/scrape-doctor")]
  scraper_url: String,

  /// Basic Auth password for the scrape service
  #[arg(long, env = "SCRAPE_AUTH_TOKEN", hide_env_values = true)]
  scrape_secret: String,

  /// Timeout for scrape requests in seconds
  #[arg(long, env = "SCRAPE_TIMEOUT_SECS", default_value_t = 30)]
  scrape_timeout_secs: u64,

  /// Chat model backend
  #[arg(long, env = "LLM_PROVIDER", value_enum, default_value_t = LlmProvider::OpenAi)]
  llm_provider: LlmProvider,

  /// Chat backend base URL (provider default when unset)
  #[arg(long, env = "LLM_BASE_URL")]
  llm_base_url: Option<String>,

  /// Chat model name (provider default when unset)
  #[arg(long, env = "LLM_MODEL")]
  llm_model: Option<String>,

  /// API key for OpenAI-compatible backends
  #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
  llm_api_key: Option<String>,

  /// Timeout for chat backend requests in seconds
  #[arg(long, env = "LLM_TIMEOUT_SECS", default_value_t = 30)]
  llm_timeout_secs: u64,

  /// Maximum tokens per answer
  #[arg(long, env = "LLM_MAX_TOKENS", default_value_t = 512)]
  llm_max_tokens: u32,

  /// Sampling temperature
  #[arg(long, env = "LLM_TEMPERATURE", default_value_t = 0.6)]
  llm_temperature: f32,

  /// Profile URL prefix for booking links
  #[arg(long, env = "BOOKING_BASE_URL", default_value = "https://www.linqmd.com/doctor-profile")]
  booking_base_url: String,

  /// Sentry DSN for error reporting (disabled when unset)
  #[arg(long, env = "SENTRY_DSN", hide_env_values = true)]
  sentry_dsn: Option<String>,

  /// Deployment environment reported with errors
  #[arg(long, env = "ENVIRONMENT", default_value = "development")]
  environment: String,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let default_filter =
    if args.verbose { "debug" } else { "doctor_chat=info,doctor_chat_server=info,profile_scraper=info,tower_http=info,warn" };
  let reporting =
    ErrorReporting { dsn: args.sentry_dsn.clone(), environment: args.environment.clone(), service: "doctor-chat-service" };
  let _sentry = telemetry::init(default_filter, &reporting)?;

  info!(version = env!("CARGO_PKG_VERSION"), bind = %args.bind, provider = ?args.llm_provider, "Starting doctor chat server");

  let config = ChatConfig {
    data_dir: args.data_dir,
    cleanup_interval: Duration::from_secs(args.cleanup_interval_secs),
    max_conversation_length: args.max_conversation_length,
    cache_refresh_interval: Duration::from_secs(args.cache_refresh_interval_secs),
    cache_sweep_interval: Duration::from_secs(args.cache_sweep_interval_secs),
    session_sweep_interval: Duration::from_secs(args.session_sweep_interval_secs),
    booking_base_url: args.booking_base_url,
  };
  let scrape =
    ScrapeTriggerConfig { url: args.scraper_url, secret: args.scrape_secret, timeout_secs: args.scrape_timeout_secs };
  let llm = LlmConfig {
    provider: args.llm_provider,
    base_url: args.llm_base_url,
    model: args.llm_model,
    api_key: args.llm_api_key,
    timeout_secs: args.llm_timeout_secs,
    max_tokens: args.llm_max_tokens,
    temperature: args.llm_temperature,
  };

  let state = build_state(&config, &scrape, &llm)?;
  start_server(args.bind, &config, state).await
}
