//! DeleteConversationHandler - removes a conversation by session id.

use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{IntakeRecordRepository, SessionStore};

/// Command to delete one conversation.
#[derive(Debug, Clone)]
pub struct DeleteConversationCommand {
    pub user_id: UserId,
    pub session_id: SessionId,
}

/// What was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConversationResult {
    pub live_deleted: bool,
    pub record_tombstoned: bool,
}

/// Purges the live session and tombstones its record, if any.
pub struct DeleteConversationHandler {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn IntakeRecordRepository>,
}

impl DeleteConversationHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, records: Arc<dyn IntakeRecordRepository>) -> Self {
        Self { sessions, records }
    }

    pub async fn handle(
        &self,
        cmd: DeleteConversationCommand,
    ) -> Result<DeleteConversationResult, IntakeError> {
        let live_deleted = self.sessions.delete(&cmd.user_id, &cmd.session_id).await?;

        let record_tombstoned = match self
            .records
            .find_by_session(&cmd.user_id, &cmd.session_id)
            .await?
        {
            Some(record) => {
                self.records.soft_delete(&cmd.user_id, &record.id).await?;
                true
            }
            None => false,
        };

        if !live_deleted && !record_tombstoned {
            return Err(IntakeError::SessionNotFound(cmd.session_id));
        }

        tracing::info!(
            user_id = %cmd.user_id,
            session_id = %cmd.session_id,
            live_deleted,
            record_tombstoned,
            "Conversation deleted"
        );

        Ok(DeleteConversationResult {
            live_deleted,
            record_tombstoned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{InMemoryIntakeRecordRepository, InMemorySessionStore};
    use crate::domain::intake::{IntakeRecord, QaPair};
    use crate::domain::session::LiveSession;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn setup() -> (DeleteConversationHandler, InMemorySessionStore, InMemoryIntakeRecordRepository) {
        let sessions = InMemorySessionStore::new();
        let records = InMemoryIntakeRecordRepository::new();
        let handler =
            DeleteConversationHandler::new(Arc::new(sessions.clone()), Arc::new(records.clone()));
        (handler, sessions, records)
    }

    #[tokio::test]
    async fn purges_live_session() {
        let (handler, sessions, _) = setup();
        let session = LiveSession::started(user());
        sessions.save(&session).await.unwrap();

        let result = handler
            .handle(DeleteConversationCommand { user_id: user(), session_id: *session.id() })
            .await
            .unwrap();

        assert!(result.live_deleted);
        assert!(!result.record_tombstoned);
        assert_eq!(sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn tombstones_record_but_keeps_row() {
        let (handler, sessions, records) = setup();
        let session = LiveSession::started(user());
        sessions.save(&session).await.unwrap();
        let record = IntakeRecord::generated(
            user(),
            *session.id(),
            vec![QaPair::new("Q", "A")],
            "Doc".into(),
        );
        records.save(&record).await.unwrap();

        let result = handler
            .handle(DeleteConversationCommand { user_id: user(), session_id: *session.id() })
            .await
            .unwrap();

        assert!(result.live_deleted && result.record_tombstoned);
        let kept = records.find_any(&record.id).await.unwrap();
        assert!(kept.is_deleted());
        assert!(records.find_by_session(&user(), session.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (handler, _, _) = setup();
        let session_id = SessionId::new();

        let err = handler
            .handle(DeleteConversationCommand { user_id: user(), session_id })
            .await
            .unwrap_err();

        assert_eq!(err, IntakeError::SessionNotFound(session_id));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let (handler, sessions, _) = setup();
        let session = LiveSession::started(user());
        sessions.save(&session).await.unwrap();
        let cmd = DeleteConversationCommand { user_id: user(), session_id: *session.id() };

        handler.handle(cmd.clone()).await.unwrap();
        assert!(handler.handle(cmd).await.is_err());
    }
}
