//! Doctor identifiers
//!
//! Identifiers arrive from untrusted clients and end up as file names, so they
//! are checked against a small allow-list before anything else sees them.

use std::fmt;

use crate::error::{Result, ScrapeError};

const MAX_LEN: usize = 128;

/// Validated doctor profile identifier (e.g., "dr-balachandra-bv")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoctorId(String);

impl DoctorId {
  /// Validate a raw identifier: 1-128 chars of `[A-Za-z0-9._-]`, no leading dot
  pub fn parse(raw: &str) -> Result<Self> {
    let valid = !raw.is_empty()
      && raw.len() <= MAX_LEN
      && !raw.starts_with('.')
      && raw.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
      Ok(Self(raw.to_string()))
    } else {
      Err(ScrapeError::InvalidDoctorId(raw.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for DoctorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for DoctorId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_accepts_profile_slugs() {
    for raw in ["dr-x", "dr-balachandra-bv", "Dr_Smith.2", "a"] {
      let id = DoctorId::parse(raw).unwrap();
      assert_eq!(id.as_str(), raw);
    }
  }

  #[test]
  fn test_rejects_path_traversal() {
    for raw in ["../etc/passwd", "..", ".hidden", "a/b", "a\\b", "dr x", ""] {
      assert!(DoctorId::parse(raw).is_err(), "accepted {raw:?}");
    }
  }

  #[test]
  fn test_rejects_overlong_identifier() {
    let raw = "d".repeat(MAX_LEN + 1);
    assert!(matches!(DoctorId::parse(&raw), Err(ScrapeError::InvalidDoctorId(_))));
    assert!(DoctorId::parse(&"d".repeat(MAX_LEN)).is_ok());
  }
}
