//! Scrape service startup

use std::net::SocketAddr;

use anyhow::Result;
use axum::serve;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::server::routing::create_router;
use crate::server::AppState;

/// Serve the scrape service until Ctrl-C
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
  let app = create_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

  let listener = TcpListener::bind(addr).await?;
  info!(%addr, "Scrape service listening");

  serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

  info!("Scrape service shut down gracefully");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
}
