//! In-Memory Session Store Adapter
//!
//! Keeps live sessions in a map keyed by (user, session). Used in
//! development and tests, and whenever no Redis URL is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::session::LiveSession;
use crate::ports::SessionStore;

type SessionKey = (UserId, SessionId);

/// In-memory storage for live sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, LiveSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions across all users.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<LiveSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&(user_id.clone(), *session_id)).cloned())
    }

    async fn save(&self, session: &LiveSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert((session.user_id().clone(), *session.id()), session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, session_id: &SessionId) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(&(user_id.clone(), *session_id)).is_some())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<LiveSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|(_, session)| session.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::Turn;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn save_then_get_returns_session() {
        let store = InMemorySessionStore::new();
        let mut session = LiveSession::started(user("alice"));
        session.append(Turn::user("yes").unwrap());

        store.save(&session).await.unwrap();
        let loaded = store.get(&user("alice"), session.id()).await.unwrap();

        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn sessions_are_scoped_by_user() {
        let store = InMemorySessionStore::new();
        let session = LiveSession::started(user("alice"));
        store.save(&session).await.unwrap();

        assert!(store.get(&user("bob"), session.id()).await.unwrap().is_none());
        assert!(store.list_by_user(&user("bob")).await.unwrap().is_empty());
        assert_eq!(store.list_by_user(&user("alice")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_replaces_existing() {
        let store = InMemorySessionStore::new();
        let mut session = LiveSession::started(user("alice"));
        store.save(&session).await.unwrap();
        session.append(Turn::user("yes").unwrap());
        store.save(&session).await.unwrap();

        assert_eq!(store.session_count().await, 1);
        let loaded = store.get(&user("alice"), session.id()).await.unwrap().unwrap();
        assert_eq!(loaded.message_count(), 2);
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let store = InMemorySessionStore::new();
        let session = LiveSession::started(user("alice"));
        store.save(&session).await.unwrap();

        assert!(store.delete(&user("alice"), session.id()).await.unwrap());
        assert!(!store.delete(&user("alice"), session.id()).await.unwrap());
    }
}
