//! In-memory cache of doctor documents
//!
//! Resolution is two-tiered: the durable store first, then a scrape trigger
//! followed by a single re-read. Concurrent misses for the same doctor share
//! one resolution through a per-key guard, and the map lock is never held
//! across store or network I/O. The whole map is dropped once the refresh
//! interval has elapsed; the durable store stays the source of truth.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use profile_scraper::{DocumentStore, DoctorId};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::services::scrape_trigger::ScrapeTrigger;

struct CacheState {
  documents: HashMap<DoctorId, Arc<str>>,
  last_refresh: Instant,
}

/// Doctor documents held in memory in front of the durable store
pub struct DoctorCache {
  store: DocumentStore,
  /// Used when the store has no document for a doctor
  trigger: Arc<dyn ScrapeTrigger>,
  /// Age after which the whole map is flushed
  refresh_interval: Duration,
  state: Mutex<CacheState>,
  /// Per-doctor guards so concurrent misses share one resolution
  in_flight: Mutex<HashMap<DoctorId, Arc<Mutex<()>>>>,
}

impl DoctorCache {
  pub fn new(store: DocumentStore, trigger: Arc<dyn ScrapeTrigger>, refresh_interval: Duration) -> Self {
    Self {
      store,
      trigger,
      refresh_interval,
      state: Mutex::new(CacheState { documents: HashMap::new(), last_refresh: Instant::now() }),
      in_flight: Mutex::new(HashMap::new()),
    }
  }

  /// Resolve a doctor's document, scraping it if no stored copy exists.
  /// `None` means the document is unavailable and the scrape failed.
  pub async fn get(&self, doctor: &DoctorId) -> Option<Arc<str>> {
    if let Some(document) = self.cached(doctor).await {
      debug!(doctor = %doctor, "Doctor cache hit");
      return Some(document);
    }

    let guard = self.in_flight.lock().await.entry(doctor.clone()).or_default().clone();
    let resolved = {
      let _resolving = guard.lock().await;
      match self.cached(doctor).await {
        Some(document) => Some(document),
        None => self.resolve(doctor).await,
      }
    };
    self.release(doctor, guard).await;

    resolved
  }

  /// Drop every cached document if the refresh interval has elapsed.
  /// Returns whether a flush happened.
  pub async fn flush_if_stale(&self) -> bool {
    let mut state = self.state.lock().await;
    if state.last_refresh.elapsed() < self.refresh_interval {
      return false;
    }

    let flushed = state.documents.len();
    state.documents.clear();
    state.last_refresh = Instant::now();
    info!(flushed, "Cleared doctor data cache");
    true
  }

  pub async fn clear(&self) {
    self.state.lock().await.documents.clear();
  }

  pub async fn len(&self) -> usize {
    self.state.lock().await.documents.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }

  async fn cached(&self, doctor: &DoctorId) -> Option<Arc<str>> {
    self.state.lock().await.documents.get(doctor).cloned()
  }

  async fn resolve(&self, doctor: &DoctorId) -> Option<Arc<str>> {
    let document = match self.read_store(doctor).await {
      Some(document) => document,
      None => {
        info!(doctor = %doctor, "Doctor cache miss, triggering scrape");
        if let Err(e) = self.trigger.trigger(doctor).await {
          warn!(doctor = %doctor, error = %e, "Scrape trigger failed");
          return None;
        }
        self.read_store(doctor).await?
      }
    };

    let document: Arc<str> = Arc::from(document);
    self.state.lock().await.documents.insert(doctor.clone(), Arc::clone(&document));
    Some(document)
  }

  /// Stored document, treating empty and unreadable files as absent
  async fn read_store(&self, doctor: &DoctorId) -> Option<String> {
    match self.store.read(doctor).await {
      Ok(Some(text)) if !text.trim().is_empty() => Some(text),
      Ok(_) => None,
      Err(e) => {
        warn!(doctor = %doctor, error = %e, "Failed to read stored document");
        None
      }
    }
  }

  /// Drop our handle on the key guard and forget it once nobody else holds it
  async fn release(&self, doctor: &DoctorId, guard: Arc<Mutex<()>>) {
    let mut in_flight = self.in_flight.lock().await;
    drop(guard);
    if in_flight.get(doctor).is_some_and(|current| Arc::strong_count(current) == 1) {
      in_flight.remove(doctor);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::services::mocks::MockTrigger;
  use tempfile::TempDir;

  fn doctor(raw: &str) -> DoctorId {
    DoctorId::parse(raw).unwrap()
  }

  fn cache(dir: &TempDir, should_fail: bool) -> (DoctorCache, Arc<MockTrigger>) {
    let store = DocumentStore::new(dir.path());
    let trigger = MockTrigger::new(store.clone(), should_fail);
    (DoctorCache::new(store, trigger.clone(), Duration::from_secs(3600)), trigger)
  }

  #[tokio::test]
  async fn test_stored_document_is_loaded_without_scrape() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dr-x.txt"), "stored").unwrap();
    let (cache, trigger) = cache(&dir, false);

    assert_eq!(cache.get(&doctor("dr-x")).await.as_deref(), Some("stored"));
    assert_eq!(trigger.calls(), 0);
    assert_eq!(cache.len().await, 1);
  }

  #[tokio::test]
  async fn test_hit_does_not_reread_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dr-x.txt"), "first").unwrap();
    let (cache, _trigger) = cache(&dir, false);

    cache.get(&doctor("dr-x")).await;
    std::fs::write(dir.path().join("dr-x.txt"), "second").unwrap();
    assert_eq!(cache.get(&doctor("dr-x")).await.as_deref(), Some("first"));
  }

  #[tokio::test]
  async fn test_miss_triggers_scrape_and_rereads() {
    let dir = TempDir::new().unwrap();
    let (cache, trigger) = cache(&dir, false);

    assert_eq!(cache.get(&doctor("dr-new")).await.as_deref(), Some("document for dr-new"));
    assert_eq!(trigger.calls(), 1);
  }

  #[tokio::test]
  async fn test_failed_scrape_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (cache, trigger) = cache(&dir, true);

    assert!(cache.get(&doctor("dr-gone")).await.is_none());
    assert_eq!(trigger.calls(), 1);
    assert!(cache.is_empty().await);
  }

  #[tokio::test]
  async fn test_empty_document_counts_as_missing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dr-x.txt"), "  \n").unwrap();
    let (cache, trigger) = cache(&dir, false);

    assert_eq!(cache.get(&doctor("dr-x")).await.as_deref(), Some("document for dr-x"));
    assert_eq!(trigger.calls(), 1);
  }

  #[tokio::test]
  async fn test_concurrent_misses_scrape_once() {
    let dir = TempDir::new().unwrap();
    let (cache, trigger) = cache(&dir, false);
    let cache = Arc::new(cache);

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get(&doctor("dr-x")).await })
      })
      .collect();

    for handle in handles {
      assert_eq!(handle.await.unwrap().as_deref(), Some("document for dr-x"));
    }
    assert_eq!(trigger.calls(), 1);
    assert!(cache.in_flight.lock().await.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_flush_waits_for_refresh_interval() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dr-x.txt"), "stored").unwrap();
    let (cache, _trigger) = cache(&dir, false);
    cache.get(&doctor("dr-x")).await;

    tokio::time::advance(Duration::from_secs(3599)).await;
    assert!(!cache.flush_if_stale().await);
    assert_eq!(cache.len().await, 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(cache.flush_if_stale().await);
    assert!(cache.is_empty().await);

    // the refresh clock restarts after a flush
    assert!(!cache.flush_if_stale().await);
  }
}
