//! Scraper configuration
//!
//! Static settings for the target site and the local document store. Binaries
//! build this from command-line flags and environment variables; library code
//! never reads the environment itself.

use std::path::PathBuf;

/// Browser-like user agent the profile site expects
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
   (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for fetching and storing doctor profiles
#[derive(Debug, Clone)]
pub struct ScraperConfig {
  /// Base URL of the profile site (e.g., "http://localhost:8080/")
  pub base_url: String,
  /// User-Agent header sent with every request
  pub user_agent: String,
  /// Timeout for each outbound request in seconds
  pub fetch_timeout_secs: u64,
  /// Directory holding one `<doctor>.txt` document per profile
  pub data_dir: PathBuf,
}

impl Default for ScraperConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080/".to_string(),
      user_agent: DEFAULT_USER_AGENT.to_string(),
      fetch_timeout_secs: 30,
      data_dir: PathBuf::from("doctorsData"),
    }
  }
}
