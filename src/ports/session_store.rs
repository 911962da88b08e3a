//! Session store port.
//!
//! Durable mapping from (user, session id) to a live session's turn
//! history. Writes must be read-your-writes within a session; the
//! orchestrator serialises requests per session so stores need no locking
//! of their own beyond what their backend provides.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::session::LiveSession;

/// Key-value store for live sessions, scoped by user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Find a session by owner and id.
    ///
    /// Returns `None` if the user has no such session.
    async fn get(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<LiveSession>, DomainError>;

    /// Insert or replace a session.
    ///
    /// # Errors
    ///
    /// - `CacheError` on backend failure
    async fn save(&self, session: &LiveSession) -> Result<(), DomainError>;

    /// Remove a session.
    ///
    /// Returns `true` if something was removed.
    async fn delete(&self, user_id: &UserId, session_id: &SessionId) -> Result<bool, DomainError>;

    /// All live sessions owned by a user, in no particular order.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<LiveSession>, DomainError>;
}
