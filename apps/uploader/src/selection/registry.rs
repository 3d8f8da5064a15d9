use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::selection::session::UploadSession;
use crate::selection::upload::Uploader;
use crate::selection::validation::ValidationRule;

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

struct SessionEntry {
    session: Arc<UploadSession>,
    created_at: DateTime<Utc>,
    /// Refreshed on every lookup; drives idle eviction.
    last_touched: Instant,
}

/// Independent upload widgets keyed by id. Every session shares the same
/// validation rule and uploader backend but owns its own state.
pub struct SessionRegistry {
    rule: ValidationRule,
    uploader: Arc<dyn Uploader>,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(rule: ValidationRule, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            rule,
            uploader,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    pub async fn create(&self) -> SessionInfo {
        let info = SessionInfo {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let session = UploadSession::new(self.rule.clone(), Arc::clone(&self.uploader));
        self.sessions.write().await.insert(
            info.id,
            SessionEntry {
                session: Arc::new(session),
                created_at: info.created_at,
                last_touched: Instant::now(),
            },
        );
        info!(session_id = %info.id, "Upload session created");
        info
    }

    /// Looks up a session and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<UploadSession>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// Removes the session and cancels its pending completion. Returns
    /// `false` when the id is unknown.
    pub async fn discard(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.session.shutdown().await;
                info!(session_id = %id, "Upload session discarded");
                true
            }
            None => false,
        }
    }

    /// Drops every session not looked up within `ttl`, cancelling pending
    /// completions. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let expired: Vec<(Uuid, SessionEntry)> = {
            let mut sessions = self.sessions.write().await;
            let stale: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| entry.last_touched.elapsed() >= ttl)
                .map(|(id, _)| *id)
                .collect();
            stale
                .into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry)))
                .collect()
        };

        for (id, entry) in &expired {
            entry.session.shutdown().await;
            info!(session_id = %id, created_at = %entry.created_at, "Upload session expired");
        }
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
