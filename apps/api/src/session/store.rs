use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::Analyzer;
use crate::session::controller::SessionController;
use crate::session::machine::Phase;

/// Sessions untouched for this long are dropped by the sweep.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
/// Upper bound on live sessions; the least recently updated one is evicted first.
pub const MAX_SESSIONS: usize = 1024;

type Registry = HashMap<Uuid, Arc<SessionController>>;

/// In-memory session registry, bounded by idle time and count. Nothing
/// survives a restart.
#[derive(Clone)]
pub struct SessionStore {
    analyzer: Arc<Analyzer>,
    sessions: Arc<RwLock<Registry>>,
    idle_ttl: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self {
            analyzer,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl: SESSION_IDLE_TTL,
            capacity: MAX_SESSIONS,
        }
    }

    pub fn with_limits(mut self, idle_ttl: Duration, capacity: usize) -> Self {
        self.idle_ttl = idle_ttl;
        self.capacity = capacity.max(1);
        self
    }

    /// Opens a fresh session in the Idle phase, making room first if the
    /// registry is full.
    pub fn create(&self) -> Arc<SessionController> {
        let controller = SessionController::new(Uuid::new_v4(), Arc::clone(&self.analyzer));
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        evict_idle(&mut sessions, self.idle_ttl, Utc::now());
        while sessions.len() >= self.capacity {
            let Some(oldest) = least_recently_updated(&sessions) else {
                break;
            };
            sessions.remove(&oldest);
            debug!("session {oldest} evicted, registry at capacity {}", self.capacity);
        }

        sessions.insert(controller.id(), Arc::clone(&controller));
        info!("session {} opened", controller.id());
        controller
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<SessionController>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Drops a session. An analysis still in flight finishes against the
    /// detached controller and is never observed.
    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            info!("session {id} closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops every session idle for longer than the TTL. Sessions still
    /// analyzing are kept. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        evict_idle(&mut sessions, self.idle_ttl, Utc::now())
    }

    /// Runs `evict_idle` every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    info!("evicted {evicted} idle sessions, {} remain", store.len());
                }
            }
        })
    }
}

fn evict_idle(sessions: &mut Registry, idle_ttl: Duration, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, controller| {
        let snapshot = controller.snapshot();
        let idle = now
            .signed_duration_since(snapshot.updated_at)
            .to_std()
            .unwrap_or_default();
        snapshot.phase == Phase::Analyzing || idle < idle_ttl
    });
    before - sessions.len()
}

/// Oldest non-analyzing session, or the oldest overall when every session is
/// mid-analysis.
fn least_recently_updated(sessions: &Registry) -> Option<Uuid> {
    sessions
        .iter()
        .map(|(id, controller)| {
            let snapshot = controller.snapshot();
            ((snapshot.phase == Phase::Analyzing, snapshot.updated_at), *id)
        })
        .min()
        .map(|(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::ResumeData;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(Analyzer::mock()))
    }

    #[test]
    fn test_create_registers_idle_session() {
        let store = store();
        let session = store.create();
        assert_eq!(store.len(), 1);
        let found = store.get(session.id()).unwrap();
        assert_eq!(found.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = store();
        let a = store.create();
        let b = store.create();
        a.start().unwrap();
        assert_eq!(a.snapshot().phase, Phase::Input);
        assert_eq!(b.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_remove_forgets_session() {
        let store = store();
        let session = store.create();
        assert!(store.remove(session.id()));
        assert!(store.get(session.id()).is_none());
        assert!(!store.remove(session.id()));
    }

    #[test]
    fn test_unknown_id_is_none() {
        assert!(store().get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_registry_is_bounded_by_capacity() {
        let store = store().with_limits(SESSION_IDLE_TTL, 8);
        let mut last = None;
        for _ in 0..500 {
            last = Some(store.create());
        }
        assert_eq!(store.len(), 8);
        // the newest session is never the one evicted
        assert!(store.get(last.unwrap().id()).is_some());
    }

    #[test]
    fn test_idle_sessions_are_swept() {
        let store = store().with_limits(Duration::ZERO, 100);
        let first = store.create();
        assert_eq!(store.evict_idle(), 1);
        assert_eq!(store.len(), 0);

        // opening a session sweeps as well
        let second = store.create();
        store.create();
        assert!(store.get(first.id()).is_none());
        assert!(store.get(second.id()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fresh_sessions_survive_sweep() {
        let store = store();
        let session = store.create();
        assert_eq!(store.evict_idle(), 0);
        assert!(store.get(session.id()).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyzing_session_outlives_ttl_and_capacity() {
        let store = store().with_limits(Duration::ZERO, 2);
        let busy = store.create();
        busy.start().unwrap();
        busy.submit(ResumeData::new("cv", "Backend Engineer")).unwrap();

        assert_eq!(store.evict_idle(), 0);

        let idle = store.create();
        let newest = store.create();
        assert!(store.get(busy.id()).is_some());
        assert!(store.get(idle.id()).is_none());
        assert!(store.get(newest.id()).is_some());
    }
}
