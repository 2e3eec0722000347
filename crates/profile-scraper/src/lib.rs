//! Profile Scraper - doctor profile extraction pipeline
//!
//! Fetches a doctor's public profile page, pulls a fixed schema of sections out
//! of it, and renders the result into the plain-text document the chat service
//! feeds to its language model.

pub mod config;
pub mod doctor;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod schema;
pub mod serialize;
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod text;

pub use config::ScraperConfig;
pub use doctor::DoctorId;
pub use error::{Result, ScrapeError};
pub use pipeline::{ScrapeOutcome, ScrapePipeline};
pub use storage::DocumentStore;
