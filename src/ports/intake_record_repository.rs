//! Intake record repository port.
//!
//! Persists finalized records. Deletion is a tombstone: deleted records
//! stay in storage but are invisible to every read below.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RecordId, SessionId, UserId};
use crate::domain::intake::IntakeRecord;

/// Repository port for finalized intake records.
#[async_trait]
pub trait IntakeRecordRepository: Send + Sync {
    /// Insert or update a record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, record: &IntakeRecord) -> Result<(), DomainError>;

    /// The non-deleted record produced by a session, if any.
    async fn find_by_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<IntakeRecord>, DomainError>;

    /// A non-deleted record by id, scoped to its owner.
    async fn find_by_id(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
    ) -> Result<Option<IntakeRecord>, DomainError>;

    /// All non-deleted records for a user, newest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<IntakeRecord>, DomainError>;

    /// Tombstone a record.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if no live record with that id belongs to the user
    async fn soft_delete(&self, user_id: &UserId, record_id: &RecordId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_record_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn IntakeRecordRepository) {}
    }
}
