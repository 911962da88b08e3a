//! Per-session request serialization.
//!
//! Two requests for the same (user, session) must not interleave their
//! read-modify-write of the turn history. Requests for different sessions
//! never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{SessionId, UserId};

type SessionKey = (UserId, SessionId);

/// Registry of async locks keyed by session.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionKey, Arc<AsyncMutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to one session.
    ///
    /// The lock is held until the returned guard is dropped.
    pub async fn acquire(&self, user_id: &UserId, session_id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries nobody else holds are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry((user_id.clone(), *session_id))
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }

    /// Number of sessions with a lock currently registered.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
