//! Storage adapters for live sessions and finalized records.
//!
//! - `InMemorySessionStore` / `InMemoryIntakeRecordRepository` - development and tests
//! - `RedisSessionStore` - shared session store for multi-server deployments
//!
//! The PostgreSQL record repository lives in `adapters::postgres`.

mod in_memory_record_repository;
mod in_memory_session_store;
mod redis_session_store;

pub use in_memory_record_repository::InMemoryIntakeRecordRepository;
pub use in_memory_session_store::InMemorySessionStore;
pub use redis_session_store::{RedisSessionStore, DEFAULT_SESSION_TTL_SECS};
