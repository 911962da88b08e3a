//! In-Memory Intake Record Repository
//!
//! Records are kept after soft deletion, exactly like the PostgreSQL
//! adapter, so tests can observe tombstones.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RecordId, SessionId, UserId};
use crate::domain::intake::IntakeRecord;
use crate::ports::IntakeRecordRepository;

/// In-memory storage for finalized records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntakeRecordRepository {
    records: Arc<RwLock<HashMap<RecordId, IntakeRecord>>>,
}

impl InMemoryIntakeRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a record including tombstoned ones.
    pub async fn find_any(&self, record_id: &RecordId) -> Option<IntakeRecord> {
        self.records.read().await.get(record_id).cloned()
    }

    /// Number of stored records, including tombstoned ones.
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl IntakeRecordRepository for InMemoryIntakeRecordRepository {
    async fn save(&self, record: &IntakeRecord) -> Result<(), DomainError> {
        self.records.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<IntakeRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| &r.user_id == user_id && &r.session_id == session_id && !r.is_deleted())
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
    ) -> Result<Option<IntakeRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(record_id)
            .filter(|r| &r.user_id == user_id && !r.is_deleted())
            .cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<IntakeRecord>, DomainError> {
        let records = self.records.read().await;
        let mut owned: Vec<IntakeRecord> = records
            .values()
            .filter(|r| &r.user_id == user_id && !r.is_deleted())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn soft_delete(&self, user_id: &UserId, record_id: &RecordId) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(record_id) {
            Some(record) if &record.user_id == user_id && !record.is_deleted() => {
                record.soft_delete();
                Ok(())
            }
            _ => Err(DomainError::new(ErrorCode::RecordNotFound, "Record not found")
                .with_detail("record_id", record_id.to_string())),
        }
    }
}
