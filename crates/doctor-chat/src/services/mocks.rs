//! Hand-written test doubles for the service traits

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use profile_scraper::{DocumentStore, DoctorId};

use crate::error::{ChatError, Result};
use crate::services::gateway::ChatGateway;
use crate::services::message::ChatMessage;
use crate::services::scrape_trigger::ScrapeTrigger;

/// Answers with the transcript length it was given, e.g. "answer to 2 messages"
pub struct MockGateway {
  pub should_fail: AtomicBool,
  calls: AtomicUsize,
}

impl MockGateway {
  pub fn new() -> Arc<Self> {
    Arc::new(Self { should_fail: AtomicBool::new(false), calls: AtomicUsize::new(0) })
  }

  pub fn set_should_fail(&self, should_fail: bool) {
    self.should_fail.store(should_fail, Ordering::SeqCst);
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ChatGateway for MockGateway {
  async fn respond(&self, messages: &[ChatMessage]) -> Result<String> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.should_fail.load(Ordering::SeqCst) {
      return Err(ChatError::Gateway("Mock backend timeout".to_string()));
    }
    Ok(format!("answer to {} messages", messages.len()))
  }
}

/// Sleeps before answering "re: <question>" so concurrent exchanges overlap.
/// The question "fail" gets a backend error.
pub struct SlowGateway {
  delay: Duration,
}

impl SlowGateway {
  pub fn new(delay: Duration) -> Arc<Self> {
    Arc::new(Self { delay })
  }
}

#[async_trait]
impl ChatGateway for SlowGateway {
  async fn respond(&self, messages: &[ChatMessage]) -> Result<String> {
    tokio::time::sleep(self.delay).await;
    let question = messages.last().map(ChatMessage::content).unwrap_or_default();
    if question == "fail" {
      return Err(ChatError::Gateway("Mock backend failure".to_string()));
    }
    Ok(format!("re: {question}"))
  }
}

/// Writes "document for <doctor>" to the store when triggered
pub struct MockTrigger {
  store: DocumentStore,
  should_fail: bool,
  calls: AtomicUsize,
}

impl MockTrigger {
  pub fn new(store: DocumentStore, should_fail: bool) -> Arc<Self> {
    Arc::new(Self { store, should_fail, calls: AtomicUsize::new(0) })
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl ScrapeTrigger for MockTrigger {
  async fn trigger(&self, doctor: &DoctorId) -> Result<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(20)).await;
    if self.should_fail {
      return Err(ChatError::Scrape("Mock scrape failure".to_string()));
    }
    self.store.write(doctor, &format!("document for {doctor}")).await?;
    Ok(())
  }
}
