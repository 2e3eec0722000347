//! HTTP access to the profile site

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::config::ScraperConfig;
use crate::doctor::DoctorId;
use crate::error::{Result, ScrapeError};
use crate::extract::FaqSource;

const PROFILE_PATH: &str = "doctor-profile/";
const FAQ_PATH: &str = "get_category_faq";

#[derive(Debug, Deserialize)]
struct FaqResponse {
  html: String,
}

/// Fetches profile pages and the FAQ fragments they reference
#[derive(Debug, Clone)]
pub struct PageFetcher {
  client: Client,
  base_url: Url,
}

impl PageFetcher {
  pub fn new(config: &ScraperConfig) -> Result<Self> {
    let client = Client::builder()
      .user_agent(config.user_agent.clone())
      .timeout(Duration::from_secs(config.fetch_timeout_secs))
      .build()?;

    Ok(Self { client, base_url: normalize_base_url(&config.base_url)? })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// `<base>/doctor-profile/<doctor>`
  pub fn profile_url(&self, doctor: &DoctorId) -> Result<Url> {
    Ok(self.base_url.join(PROFILE_PATH)?.join(doctor.as_str())?)
  }

  /// GET a page, treating any non-success status as a fetch failure
  pub async fn fetch_page(&self, url: &Url) -> Result<String> {
    debug!(url = %url, "Fetching page");

    let fetch_error = |source| ScrapeError::Fetch { url: url.to_string(), source };

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(fetch_error)?;

    let body = response.text().await.map_err(fetch_error)?;
    info!(url = %url, bytes = body.len(), "Fetched page");
    Ok(body)
  }
}

#[async_trait]
impl FaqSource for PageFetcher {
  async fn fetch_faq_fragment(&self, owner: &str) -> Result<String> {
    let url = self.base_url.join(FAQ_PATH)?;
    debug!(url = %url, owner, "Requesting remaining FAQs");

    let response = self
      .client
      .post(url)
      .form(&[("username", owner)])
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| ScrapeError::Faq(e.to_string()))?;

    let body: FaqResponse = response.json().await.map_err(|e| ScrapeError::Faq(e.to_string()))?;
    Ok(body.html)
  }
}

/// Parse the configured base URL so relative joins stay under its path
fn normalize_base_url(raw: &str) -> Result<Url> {
  let mut url = Url::parse(raw.trim())?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fetcher(base_url: &str) -> PageFetcher {
    let config = ScraperConfig { base_url: base_url.to_string(), ..ScraperConfig::default() };
    PageFetcher::new(&config).unwrap()
  }

  #[test]
  fn test_profile_url_joins_doctor_path() {
    let fetcher = fetcher("https://www.linqmd.com");
    let doctor = DoctorId::parse("dr-x").unwrap();
    assert_eq!(fetcher.profile_url(&doctor).unwrap().as_str(), "https://www.linqmd.com/doctor-profile/dr-x");
  }

  #[test]
  fn test_base_url_path_is_preserved() {
    let fetcher = fetcher("http://localhost:8080/site");
    assert_eq!(fetcher.base_url().as_str(), "http://localhost:8080/site/");

    let doctor = DoctorId::parse("dr-y").unwrap();
    assert_eq!(fetcher.profile_url(&doctor).unwrap().as_str(), "http://localhost:8080/site/doctor-profile/dr-y");
  }

  #[test]
  fn test_invalid_base_url_is_rejected() {
    let config = ScraperConfig { base_url: "not a url".to_string(), ..ScraperConfig::default() };
    assert!(matches!(PageFetcher::new(&config), Err(ScrapeError::Url(_))));
  }

  #[tokio::test]
  async fn test_unreachable_host_is_fetch_error() {
    let fetcher = fetcher("http://127.0.0.1:1/");
    let url = fetcher.base_url().join("doctor-profile/dr-x").unwrap();
    assert!(matches!(fetcher.fetch_page(&url).await, Err(ScrapeError::Fetch { .. })));
  }
}
