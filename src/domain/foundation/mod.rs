//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the authenticated
//! identity that form the vocabulary of the intake domain.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{RecordId, SessionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
