use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::selection::registry::SessionRegistry;

/// Periodically evicts upload sessions whose client went away without
/// discarding them (closed tab, crashed browser).
pub struct SessionSweeper {
    sessions: Arc<SessionRegistry>,
    ttl: Duration,
    every: Duration,
    shutdown: watch::Receiver<bool>,
}

impl SessionSweeper {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        ttl: Duration,
        every: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            sessions,
            ttl,
            every,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        info!(
            ttl_secs = self.ttl.as_secs(),
            every_secs = self.every.as_secs(),
            "Session sweeper started"
        );

        let mut ticker = tokio::time::interval(self.every);
        // first tick fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("Session sweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    async fn sweep(&self) {
        let evicted = self.sessions.evict_idle(self.ttl).await;
        let remaining = self.sessions.len().await;
        if evicted > 0 {
            info!(evicted, remaining, "Expired idle upload sessions");
        } else {
            debug!(remaining, "No idle upload sessions to expire");
        }
    }
}
