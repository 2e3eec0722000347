//! Doctor Chat - question answering over scraped doctor profiles
//!
//! Answers patient questions about a specific doctor by handing the doctor's
//! scraped profile document to a chat model as context, keeping a short-lived
//! conversation per (doctor, user) pair.

pub mod config;
pub mod error;
pub mod prompt;
pub mod server;
pub mod services;

pub use config::{ChatConfig, LlmConfig, LlmProvider, ScrapeTriggerConfig};
pub use error::{ChatError, Result};
