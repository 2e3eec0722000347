use thiserror::Error;

/// Errors produced while fetching, extracting or persisting a doctor profile
#[derive(Debug, Error)]
pub enum ScrapeError {
  #[error("Invalid doctor identifier '{0}'")]
  InvalidDoctorId(String),

  #[error("Invalid selector token '{token}': {message}")]
  Selector { token: String, message: String },

  #[error("Invalid URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("Failed to fetch the page {url}: {source}")]
  Fetch {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("FAQ request failed: {0}")]
  Faq(String),

  #[error("HTTP client error: {0}")]
  Client(#[from] reqwest::Error),

  #[error("Failed to access document storage: {0}")]
  Storage(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
