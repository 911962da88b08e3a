//! InitializeSessionHandler - starts a new live session.

use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::LiveSession;
use crate::ports::SessionStore;

/// Command to start a session.
#[derive(Debug, Clone)]
pub struct InitializeSessionCommand {
    pub user_id: UserId,
}

/// Result of starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeSessionResult {
    pub session_id: SessionId,
}

/// Creates a session whose history holds the readiness prompt.
pub struct InitializeSessionHandler {
    sessions: Arc<dyn SessionStore>,
}

impl InitializeSessionHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(
        &self,
        cmd: InitializeSessionCommand,
    ) -> Result<InitializeSessionResult, IntakeError> {
        let session = LiveSession::started(cmd.user_id);
        self.sessions.save(&session).await?;

        tracing::info!(
            user_id = %session.user_id(),
            session_id = %session.id(),
            "Session initialized"
        );

        Ok(InitializeSessionResult {
            session_id: *session.id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::intake::prompts::READINESS_PROMPT;

    #[tokio::test]
    async fn stores_session_with_readiness_prompt() {
        let store = InMemorySessionStore::new();
        let handler = InitializeSessionHandler::new(Arc::new(store.clone()));
        let user = UserId::new("user-1").unwrap();

        let result = handler
            .handle(InitializeSessionCommand { user_id: user.clone() })
            .await
            .unwrap();

        let session = store.get(&user, &result.session_id).await.unwrap().unwrap();
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.turns()[0].content(), READINESS_PROMPT);
    }

    #[tokio::test]
    async fn each_call_creates_a_distinct_session() {
        let store = InMemorySessionStore::new();
        let handler = InitializeSessionHandler::new(Arc::new(store.clone()));
        let user = UserId::new("user-1").unwrap();

        let a = handler.handle(InitializeSessionCommand { user_id: user.clone() }).await.unwrap();
        let b = handler.handle(InitializeSessionCommand { user_id: user }).await.unwrap();

        assert_ne!(a.session_id, b.session_id);
        assert_eq!(store.session_count().await, 2);
    }
}
