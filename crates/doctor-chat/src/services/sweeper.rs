//! Background eviction of idle conversations and stale cache entries

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::services::conversations::ConversationStore;
use crate::services::doctor_cache::DoctorCache;

/// Owns the periodic sweep tasks; they stop when [`Sweeper::shutdown`] is called
pub struct Sweeper {
  token: CancellationToken,
  handles: Vec<JoinHandle<()>>,
}

impl Sweeper {
  pub fn spawn(
    sessions: Arc<ConversationStore>,
    cache: Arc<DoctorCache>,
    session_interval: Duration,
    cache_interval: Duration,
  ) -> Self {
    let token = CancellationToken::new();

    let handles = vec![
      spawn_periodic("sessions", session_interval, token.clone(), move || {
        let sessions = sessions.clone();
        async move {
          sessions.sweep_idle().await;
        }
      }),
      spawn_periodic("doctor-cache", cache_interval, token.clone(), move || {
        let cache = cache.clone();
        async move {
          cache.flush_if_stale().await;
        }
      }),
    ];

    info!(?session_interval, ?cache_interval, "Background sweeps started");
    Self { token, handles }
  }

  pub fn token(&self) -> CancellationToken {
    self.token.clone()
  }

  /// Cancel both sweeps and wait for them to finish
  pub async fn shutdown(self) {
    self.token.cancel();
    for handle in self.handles {
      let _ = handle.await;
    }
    info!("Background sweeps stopped");
  }
}

/// Run `task` every `period` (at least 1s), starting one period from now
fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, token: CancellationToken, task: F) -> JoinHandle<()>
where
  F: Fn() -> Fut + Send + 'static,
  Fut: Future<Output = ()> + Send + 'static,
{
  tokio::spawn(async move {
    let mut ticker = interval(period.max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
      tokio::select! {
        _ = token.cancelled() => break,
        _ = ticker.tick() => {
          debug!(sweep = name, "Running sweep");
          task().await;
        }
      }
    }
  })
}
