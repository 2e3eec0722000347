use profile_scraper::ScrapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
  /// Rejected client input
  #[error("{0}")]
  Validation(String),

  #[error("Unable to retrieve doctor data for: {0}")]
  DoctorNotFound(String),

  #[error("Chat backend error: {0}")]
  Gateway(String),

  #[error("Scrape request failed: {0}")]
  Scrape(String),

  #[error("HTTP client error: {0}")]
  Http(#[from] reqwest::Error),

  #[error(transparent)]
  Profile(#[from] ScrapeError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
