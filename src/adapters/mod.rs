//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers and the statement generator
//! - `auth` - bearer-token validators (JWT, mock)
//! - `http` - axum REST surface
//! - `postgres` - PostgreSQL record repository
//! - `retrieval` - similar-case retrieval (Pinecone, in-memory)
//! - `storage` - session stores and in-memory repositories

pub mod ai;
pub mod auth;
pub mod http;
pub mod postgres;
pub mod retrieval;
pub mod storage;
