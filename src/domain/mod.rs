//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, identity)
//! - `intake` - Question bank, turn history and the conversation classifier
//! - `session` - Live sessions and the unified conversation listing shape

pub mod foundation;
pub mod intake;
pub mod session;
