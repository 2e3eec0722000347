//! Populating the document store on a cache miss

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use profile_scraper::{DocumentStore, DoctorId, ScrapePipeline};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::ScrapeTriggerConfig;
use crate::error::{ChatError, Result};

/// Asks for a doctor's document to be written to the shared store.
/// `Ok` means a fresh read of the store is worth attempting.
#[async_trait]
pub trait ScrapeTrigger: Send + Sync {
  async fn trigger(&self, doctor: &DoctorId) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ScrapeServiceResponse {
  #[serde(default)]
  success: bool,
  message: Option<String>,
  /// Document text, for scrape services that do not share the data directory
  data: Option<String>,
}

/// Calls the internal scrape service over HTTP
pub struct HttpScrapeTrigger {
  client: Client,
  url: String,
  secret: String,
  store: DocumentStore,
}

impl HttpScrapeTrigger {
  pub fn new(config: &ScrapeTriggerConfig, store: DocumentStore) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
    Ok(Self { client, url: config.url.clone(), secret: config.secret.clone(), store })
  }
}

#[async_trait]
impl ScrapeTrigger for HttpScrapeTrigger {
  async fn trigger(&self, doctor: &DoctorId) -> Result<()> {
    info!(doctor = %doctor, url = %self.url, "Requesting scrape");

    let response = self
      .client
      .post(&self.url)
      .basic_auth("", Some(&self.secret))
      .json(&json!({ "doctor_username": doctor.as_str() }))
      .send()
      .await
      .map_err(|e| scrape_error(doctor, format!("Error connecting to scraping service: {e}")))?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(scrape_error(doctor, format!("Scraping service returned status code {}", status.as_u16())));
    }

    let body: ScrapeServiceResponse =
      response.json().await.map_err(|e| scrape_error(doctor, format!("Invalid scraping service response: {e}")))?;

    if !body.success {
      let message = body.message.unwrap_or_else(|| "Unknown error during scraping".to_string());
      return Err(scrape_error(doctor, message));
    }

    if let Some(document) = body.data {
      self.store.write(doctor, &document).await?;
      info!(doctor = %doctor, "Saved document returned by scraping service");
    }

    Ok(())
  }
}

fn scrape_error(doctor: &DoctorId, message: String) -> ChatError {
  error!(doctor = %doctor, error = %message, "Scrape request failed");
  ChatError::Scrape(message)
}

/// Runs the scrape pipeline in-process
pub struct LocalScrapeTrigger {
  pipeline: Arc<ScrapePipeline>,
}

impl LocalScrapeTrigger {
  pub fn new(pipeline: Arc<ScrapePipeline>) -> Self {
    Self { pipeline }
  }
}

#[async_trait]
impl ScrapeTrigger for LocalScrapeTrigger {
  async fn trigger(&self, doctor: &DoctorId) -> Result<()> {
    let outcome = self.pipeline.scrape(doctor).await?;
    info!(doctor = %doctor, path = %outcome.path.display(), "Scraped profile in-process");
    Ok(())
  }
}
