use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::state::{OptimizationSession, SessionStatus};

/// How often the background sweep looks for expired sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub type SessionHandle = Arc<Mutex<OptimizationSession>>;

/// Process-local session table. Each session sits behind its own async mutex,
/// so calls against one session serialize while different sessions proceed
/// in parallel. Terminal sessions stay registered until their retention
/// window passes, so late calls get `InvalidState` rather than `NotFound`.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: OptimizationSession) -> Uuid {
        let id = session.id();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        debug!("Registered session {id}");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions not updated within their window as of `now`: `retention`
    /// for finalized or abandoned sessions, `idle` for open ones. Sessions
    /// locked by an in-flight call are skipped. Returns how many were removed.
    pub async fn evict_expired(&self, now: DateTime<Utc>, policy: &EvictionPolicy) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| {
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            let window = match session.status() {
                SessionStatus::Open => policy.idle,
                SessionStatus::Finalized | SessionStatus::Abandoned => policy.retention,
            };
            let expired = (now - session.updated_at())
                .to_std()
                .is_ok_and(|age| age > window);
            if expired {
                debug!("Evicting session {id} ({:?})", session.status());
            }
            !expired
        });
        before - sessions.len()
    }

    /// Runs `evict_expired` every `SWEEP_INTERVAL` for the life of the process.
    pub fn spawn_sweeper(&self, policy: EvictionPolicy) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_expired(Utc::now(), &policy).await;
                if evicted > 0 {
                    info!("Evicted {evicted} expired session(s)");
                }
            }
        })
    }
}

/// Session lifetimes, from config.
#[derive(Debug, Clone, Copy)]
pub struct EvictionPolicy {
    /// Open sessions untouched this long are dropped.
    pub idle: Duration,
    /// Finalized or abandoned sessions are kept this long after closing.
    pub retention: Duration,
}
