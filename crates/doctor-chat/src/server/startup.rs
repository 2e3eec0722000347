//! Chat service startup and wiring

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::serve;
use profile_scraper::DocumentStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::{ChatConfig, LlmConfig, ScrapeTriggerConfig};
use crate::server::routing::create_router;
use crate::server::AppState;
use crate::services::conversations::ConversationStore;
use crate::services::doctor_cache::DoctorCache;
use crate::services::gateway::build_gateway;
use crate::services::scrape_trigger::HttpScrapeTrigger;
use crate::services::sweeper::Sweeper;

/// Build the chat services from configuration
pub fn build_state(config: &ChatConfig, scrape: &ScrapeTriggerConfig, llm: &LlmConfig) -> Result<AppState> {
  let store = DocumentStore::new(&config.data_dir);
  let trigger = HttpScrapeTrigger::new(scrape, store.clone()).context("Failed to create scrape client")?;
  let cache = Arc::new(DoctorCache::new(store, Arc::new(trigger), config.cache_refresh_interval));
  let gateway = build_gateway(llm).context("Failed to create chat backend client")?;

  Ok(AppState::new(Arc::new(ConversationStore::new(cache, gateway, config))))
}

/// Serve the chat API with background sweeps until Ctrl-C
pub async fn start_server(addr: SocketAddr, config: &ChatConfig, state: AppState) -> Result<()> {
  let sweeper = Sweeper::spawn(
    state.sessions.clone(),
    state.cache.clone(),
    config.session_sweep_interval,
    config.cache_sweep_interval,
  );
  let shutdown = sweeper.token();

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(addr).await?;
  info!(%addr, "Chat service listening");

  tokio::spawn({
    let shutdown = shutdown.clone();
    async move {
      match tokio::signal::ctrl_c().await {
        Ok(()) => {
          info!("Shutdown signal received");
          shutdown.cancel();
        }
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
      }
    }
  });

  let served = serve(listener, app).with_graceful_shutdown(shutdown.cancelled_owned()).await;
  sweeper.shutdown().await;

  served.map_err(|e| anyhow::anyhow!("Server error: {e}"))?;
  info!("Chat service shut down gracefully");
  Ok(())
}
