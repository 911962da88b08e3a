//! ListConversationsHandler - merged listing of live sessions and records.

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::UserId;
use crate::domain::session::{ConversationEntry, ConversationSummary};
use crate::ports::{IntakeRecordRepository, SessionStore};

/// Query for one user's conversations.
#[derive(Debug, Clone)]
pub struct ListConversationsQuery {
    pub user_id: UserId,
}

/// Lists conversations, most recent first.
///
/// A session that produced a record is listed once, as the record. Live
/// sessions the user has not spoken in yet are left out.
pub struct ListConversationsHandler {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn IntakeRecordRepository>,
}

impl ListConversationsHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, records: Arc<dyn IntakeRecordRepository>) -> Self {
        Self { sessions, records }
    }

    pub async fn handle(
        &self,
        query: ListConversationsQuery,
    ) -> Result<Vec<ConversationSummary>, IntakeError> {
        let records = self.records.list_by_user(&query.user_id).await?;
        let live = self.sessions.list_by_user(&query.user_id).await?;

        let finalized: HashSet<_> = records.iter().map(|r| r.session_id).collect();

        let mut summaries: Vec<ConversationSummary> = live
            .into_iter()
            .filter(|s| s.has_user_turns() && !finalized.contains(s.id()))
            .map(ConversationEntry::Live)
            .chain(records.into_iter().map(ConversationEntry::Finalized))
            .map(|entry| entry.summary())
            .collect();

        summaries.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        Ok(summaries)
    }
}
