pub mod conversations;
pub mod doctor_cache;
pub mod gateway;
pub mod message;
pub mod scrape_trigger;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod mocks;
