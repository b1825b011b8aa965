//! Per-session single-flight locking.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per active session id.
///
/// Entries are created on first use and dropped again once the last holder
/// or waiter releases them, so the map only tracks sessions in flight.
#[derive(Debug, Default, Clone)]
pub struct SessionLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `session_id`, then hold it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;
        SessionGuard {
            locks: Arc::clone(&self.locks),
            session_id: session_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of sessions with a holder or waiter.
    pub fn active(&self) -> usize {
        self.locks.len()
    }
}

/// Held while a session is being worked on.
#[derive(Debug)]
pub struct SessionGuard {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // The map and this guard each own one reference; anything above two
        // means another caller is waiting on the same mutex.
        self.locks
            .remove_if(&self.session_id, |_, lock| Arc::strong_count(lock) <= 2);
        self.guard.take();
    }
}
