//! Fetch, extract, serialize and store a single doctor profile

use std::path::PathBuf;

use tracing::info;

use crate::config::ScraperConfig;
use crate::doctor::DoctorId;
use crate::error::Result;
use crate::extract::Extractor;
use crate::fetch::PageFetcher;
use crate::schema::DOCTOR_PROFILE;
use crate::serialize::serialize;
use crate::storage::DocumentStore;

#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
  pub path: PathBuf,
  pub document: String,
}

impl ScrapeOutcome {
  /// File name of the stored document (e.g., "dr-x.txt")
  pub fn filename(&self) -> String {
    self.path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
  }
}

pub struct ScrapePipeline {
  fetcher: PageFetcher,
  extractor: Extractor,
  store: DocumentStore,
}

impl ScrapePipeline {
  pub fn new(config: &ScraperConfig) -> Result<Self> {
    let fetcher = PageFetcher::new(config)?;
    let extractor = Extractor::new(&DOCTOR_PROFILE, fetcher.base_url().clone())?;
    Ok(Self { fetcher, extractor, store: DocumentStore::new(&config.data_dir) })
  }

  pub fn store(&self) -> &DocumentStore {
    &self.store
  }

  /// Scrape a profile and persist its document. A failed page fetch aborts
  /// before anything is written.
  pub async fn scrape(&self, doctor: &DoctorId) -> Result<ScrapeOutcome> {
    let url = self.fetcher.profile_url(doctor)?;
    let html = self.fetcher.fetch_page(&url).await?;

    let result = self.extractor.extract(&html, &self.fetcher).await;
    let document = serialize(&result);
    let path = self.store.write(doctor, &document).await?;

    info!(
      doctor = %doctor,
      path = %path.display(),
      faqs = result.faqs.len(),
      blogs = result.blogs.len(),
      "Scraped doctor profile"
    );

    Ok(ScrapeOutcome { path, document })
  }
}
