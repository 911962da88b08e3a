//! GetConversationHandler - full history for one session.

use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::ConversationEntry;
use crate::ports::{IntakeRecordRepository, SessionStore};

/// Query for one conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub user_id: UserId,
    pub session_id: SessionId,
}

/// Loads a conversation, preferring the live history.
///
/// When only the record survives, its transcript is rebuilt from the
/// stored question and answer pairs.
pub struct GetConversationHandler {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn IntakeRecordRepository>,
}

impl GetConversationHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, records: Arc<dyn IntakeRecordRepository>) -> Self {
        Self { sessions, records }
    }

    pub async fn handle(&self, query: GetConversationQuery) -> Result<ConversationEntry, IntakeError> {
        if let Some(session) = self.sessions.get(&query.user_id, &query.session_id).await? {
            return Ok(ConversationEntry::Live(session));
        }

        self.records
            .find_by_session(&query.user_id, &query.session_id)
            .await?
            .map(ConversationEntry::Finalized)
            .ok_or(IntakeError::SessionNotFound(query.session_id))
    }
}
