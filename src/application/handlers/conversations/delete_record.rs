//! DeleteRecordHandler - tombstones a finalized record by id.

use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::{RecordId, UserId};
use crate::ports::{IntakeRecordRepository, SessionStore};

/// Command to delete one record.
#[derive(Debug, Clone)]
pub struct DeleteRecordCommand {
    pub user_id: UserId,
    pub record_id: RecordId,
}

/// Soft-deletes a record the user owns.
///
/// The live history of the session that produced it goes too, so the
/// conversation does not resurface in listings.
pub struct DeleteRecordHandler {
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn IntakeRecordRepository>,
}

impl DeleteRecordHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, records: Arc<dyn IntakeRecordRepository>) -> Self {
        Self { sessions, records }
    }

    pub async fn handle(&self, cmd: DeleteRecordCommand) -> Result<(), IntakeError> {
        let record = self
            .records
            .find_by_id(&cmd.user_id, &cmd.record_id)
            .await?
            .ok_or(IntakeError::RecordNotFound(cmd.record_id))?;

        self.records.soft_delete(&cmd.user_id, &record.id).await?;
        let live_deleted = self.sessions.delete(&cmd.user_id, &record.session_id).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            record_id = %cmd.record_id,
            session_id = %record.session_id,
            live_deleted,
            "Record deleted"
        );
        Ok(())
    }
}
