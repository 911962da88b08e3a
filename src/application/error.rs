//! Application-level errors for the intake flow.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, RecordId, SessionId, ValidationError};
use crate::domain::intake::QuestionBankError;

/// Errors surfaced by intake command and query handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl IntakeError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        IntakeError::Infrastructure(message.into())
    }
}

impl From<ValidationError> for IntakeError {
    fn from(err: ValidationError) -> Self {
        IntakeError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for IntakeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmptyField | ErrorCode::InvalidFormat => IntakeError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => IntakeError::Infrastructure(err.to_string()),
        }
    }
}

impl From<QuestionBankError> for IntakeError {
    fn from(err: QuestionBankError) -> Self {
        IntakeError::Infrastructure(err.to_string())
    }
}
