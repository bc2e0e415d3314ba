use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

/// One session, locked per operation. The lock is never held across the generation call.
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    handle: SessionHandle,
    last_access: Instant,
}

/// In-memory session registry. Dropping a session discards its document.
///
/// Every lookup refreshes the session's last access; sessions idle for longer than the TTL are
/// removed by `evict_idle`.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionHandle {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_access: Instant::now(),
            },
        );
        info!("Session {id} created");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        entry.last_access = Instant::now();
        Ok(entry.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session {id} discarded"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session not accessed within `ttl`. Returns how many were removed.
    ///
    /// A generation still running on an evicted session completes against its own handle.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }
        evicted
    }

    /// Runs `evict_idle` every `period` for the life of the process.
    pub fn spawn_eviction(&self, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.evict_idle(ttl).await;
            }
        })
    }
}
