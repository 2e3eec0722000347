//! Durable document storage: one `<doctor>.txt` file per profile

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::doctor::DoctorId;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DocumentStore {
  root: PathBuf,
}

impl DocumentStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn path_for(&self, doctor: &DoctorId) -> PathBuf {
    self.root.join(format!("{doctor}.txt"))
  }

  /// Read a stored document; `None` when the doctor has never been scraped
  pub async fn read(&self, doctor: &DoctorId) -> Result<Option<String>> {
    let path = self.path_for(doctor);
    match fs::read_to_string(&path).await {
      Ok(text) => Ok(Some(text)),
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(path = %path.display(), "No stored document");
        Ok(None)
      }
      Err(e) => Err(e.into()),
    }
  }

  /// Write (or replace) a document, creating the data directory on demand
  pub async fn write(&self, doctor: &DoctorId, document: &str) -> Result<PathBuf> {
    fs::create_dir_all(&self.root).await?;
    let path = self.path_for(doctor);
    fs::write(&path, document).await?;
    debug!(path = %path.display(), bytes = document.len(), "Stored document");
    Ok(path)
  }
}
