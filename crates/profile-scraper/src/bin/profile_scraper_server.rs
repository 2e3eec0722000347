//! Profile Scraper Server
//!
//! Internal HTTP service that scrapes doctor profile pages on demand and stores
//! the rendered documents for the chat service.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use profile_scraper::config::DEFAULT_USER_AGENT;
use profile_scraper::telemetry::{self, ErrorReporting};
use profile_scraper::server::{startup::start_server, AppState};
use profile_scraper::{ScrapePipeline, ScraperConfig};

#[derive(Parser)]
#[command(name = "profile_scraper_server")]
#[command(about = "Doctor profile scrape service")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, env = "PROFILE_SCRAPER_BIND", default_value = "0.0.0.0:5001")]
  bind: SocketAddr,

  /// Base URL of the doctor profile site
  #[arg(long, env = "SCRAPER_BASE_URL", default_value = "http://localhost:8080/")]
  base_url: String,

  /// Directory the scraped documents are written to
  #[arg(long, env = "DOCTOR_DATA_DIR", default_value = "doctorsData")]
  data_dir: PathBuf,

  /// Shared secret expected as the Basic Auth password
  #[arg(long, env = "SCRAPE_AUTH_TOKEN", hide_env_values = true)]
  auth_token: String,

  /// Timeout for requests to the profile site in seconds
  #[arg(long, env = "SCRAPER_FETCH_TIMEOUT_SECS", default_value_t = 30)]
  fetch_timeout_secs: u64,

  /// User-Agent header sent to the profile site
  #[arg(long, env = "SCRAPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
  user_agent: String,

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
    if args.verbose { "debug" } else { "profile_scraper=info,profile_scraper_server=info,tower_http=info,warn" };
  let reporting =
    ErrorReporting { dsn: args.sentry_dsn.clone(), environment: args.environment.clone(), service: "profile-scraper-service" };
  let _sentry = telemetry::init(default_filter, &reporting)?;

  info!(version = env!("CARGO_PKG_VERSION"), bind = %args.bind, "Starting profile scraper server");

  let config = ScraperConfig {
    base_url: args.base_url,
    user_agent: args.user_agent,
    fetch_timeout_secs: args.fetch_timeout_secs,
    data_dir: args.data_dir,
  };
  let pipeline = ScrapePipeline::new(&config).context("Failed to initialize scrape pipeline")?;

  start_server(args.bind, AppState::new(pipeline, args.auth_token)).await
}
