//! Logging and error reporting setup for the service binaries
//!
//! Logs go to stdout through `tracing_subscriber`. When a Sentry DSN is
//! configured, `error!` events are also reported to Sentry and lower levels
//! are attached to them as breadcrumbs.

use std::borrow::Cow;

use anyhow::{Context, Result};
use sentry::{ClientInitGuard, ClientOptions};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone)]
pub struct ErrorReporting {
  /// Sentry DSN; reporting is disabled when unset or blank
  pub dsn: Option<String>,
  /// Environment tag attached to every event
  pub environment: String,
  /// Value of the `service` tag attached to every event
  pub service: &'static str,
}

impl ErrorReporting {
  pub fn disabled(service: &'static str) -> Self {
    Self { dsn: None, environment: "development".to_string(), service }
  }

  /// Client options for the configured DSN, `None` when reporting is off
  pub fn client_options(&self) -> Result<Option<ClientOptions>> {
    let Some(dsn) = self.dsn.as_deref().map(str::trim).filter(|dsn| !dsn.is_empty()) else {
      return Ok(None);
    };

    let dsn = dsn.parse().context("Invalid Sentry DSN")?;
    Ok(Some(ClientOptions {
      dsn: Some(dsn),
      environment: Some(Cow::Owned(self.environment.clone())),
      release: Some(Cow::Owned(format!("{}@{}", self.service, env!("CARGO_PKG_VERSION")))),
      ..ClientOptions::default()
    }))
  }
}

/// Install the global subscriber and, if configured, the Sentry client.
/// Keep the returned guard alive for the life of the process so queued
/// events are flushed on exit.
pub fn init(default_filter: &str, reporting: &ErrorReporting) -> Result<Option<ClientInitGuard>> {
  let guard = reporting.client_options()?.map(sentry::init);
  if guard.is_some() {
    sentry::configure_scope(|scope| scope.set_tag("service", reporting.service));
  }

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::registry().with(fmt::layer()).with(filter).with(sentry_tracing::layer()).init();

  Ok(guard)
}
