//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresIntakeRecordRepository` - finalized records with soft delete

mod intake_record_repository;

pub use intake_record_repository::PostgresIntakeRecordRepository;
