//! PostgreSQL implementation of IntakeRecordRepository.
//!
//! Q&A pairs are stored as JSONB. Deletion sets `deleted_at`; every read
//! filters tombstones out.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, RecordId, SessionId, Timestamp, UserId,
};
use crate::domain::intake::{IntakeRecord, QaPair, RecordStatus};
use crate::ports::IntakeRecordRepository;

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, session_id, title, pairs::text AS pairs, document, status,
           created_at, updated_at, deleted_at
    FROM intake_records
"#;

/// PostgreSQL implementation of IntakeRecordRepository.
#[derive(Clone)]
pub struct PostgresIntakeRecordRepository {
    pool: PgPool,
}

impl PostgresIntakeRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl IntakeRecordRepository for PostgresIntakeRecordRepository {
    async fn save(&self, record: &IntakeRecord) -> Result<(), DomainError> {
        let pairs = serde_json::to_string(&record.pairs)
            .map_err(|e| db_error("Failed to encode pairs", e))?;

        sqlx::query(
            r#"
            INSERT INTO intake_records (
                id, user_id, session_id, title, pairs, document, status,
                created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, $5::jsonb, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                pairs = EXCLUDED.pairs,
                document = EXCLUDED.document,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_str())
        .bind(record.session_id.as_uuid())
        .bind(&record.title)
        .bind(pairs)
        .bind(record.document.as_deref())
        .bind(record.status.as_str())
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .bind(record.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save intake record", e))?;

        Ok(())
    }

    async fn find_by_session(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<IntakeRecord>, DomainError> {
        let sql = format!(
            "{} WHERE user_id = $1 AND session_id = $2 AND deleted_at IS NULL \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id.as_str())
            .bind(session_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch record by session", e))?;

        row.map(row_to_record).transpose()
    }

    async fn find_by_id(
        &self,
        user_id: &UserId,
        record_id: &RecordId,
    ) -> Result<Option<IntakeRecord>, DomainError> {
        let sql = format!(
            "{} WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(record_id.as_uuid())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch record", e))?;

        row.map(row_to_record).transpose()
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<IntakeRecord>, DomainError> {
        let sql = format!(
            "{} WHERE user_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list records", e))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn soft_delete(&self, user_id: &UserId, record_id: &RecordId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE intake_records
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(record_id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to delete record", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RecordNotFound,
                format!("Record not found: {}", record_id),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn decode_pairs(json: &str) -> Result<Vec<QaPair>, DomainError> {
    serde_json::from_str(json).map_err(|e| db_error("Invalid pairs column", e))
}

fn row_to_record(row: sqlx::postgres::PgRow) -> Result<IntakeRecord, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| db_error("Failed to get id", e))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| db_error("Failed to get user_id", e))?;
    let session_id: uuid::Uuid = row
        .try_get("session_id")
        .map_err(|e| db_error("Failed to get session_id", e))?;
    let title: String = row
        .try_get("title")
        .map_err(|e| db_error("Failed to get title", e))?;
    let pairs: String = row
        .try_get("pairs")
        .map_err(|e| db_error("Failed to get pairs", e))?;
    let document: Option<String> = row
        .try_get("document")
        .map_err(|e| db_error("Failed to get document", e))?;
    let status: String = row
        .try_get("status")
        .map_err(|e| db_error("Failed to get status", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| db_error("Failed to get created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| db_error("Failed to get updated_at", e))?;
    let deleted_at: Option<chrono::DateTime<chrono::Utc>> = row
        .try_get("deleted_at")
        .map_err(|e| db_error("Failed to get deleted_at", e))?;

    Ok(IntakeRecord {
        id: RecordId::from_uuid(id),
        user_id: UserId::new(user_id).map_err(|e| db_error("Invalid user_id", e))?,
        session_id: SessionId::from_uuid(session_id),
        title,
        pairs: decode_pairs(&pairs)?,
        document,
        status: status
            .parse::<RecordStatus>()
            .map_err(|e| db_error("Invalid status", e))?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
        deleted_at: deleted_at.map(Timestamp::from_datetime),
    })
}
