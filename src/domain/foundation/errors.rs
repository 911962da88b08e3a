//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Rejected input while building a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field } | ValidationError::InvalidFormat { field, .. } => {
                field
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyField,
    InvalidFormat,

    RecordNotFound,

    /// A session phase or record status edge that does not exist.
    InvalidStateTransition,

    /// Record repository failure.
    DatabaseError,
    /// Session store failure.
    CacheError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Error raised by domain objects and storage adapters.
///
/// `details["field"]` names the offending field for validation codes.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        };
        let field = err.field().to_string();
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_names_the_field() {
        let err = ValidationError::empty_field("content");
        assert_eq!(err.to_string(), "Field 'content' cannot be empty");
        assert_eq!(err.field(), "content");
    }

    #[test]
    fn store_failures_render_code_first() {
        let err = DomainError::new(ErrorCode::CacheError, "Redis error: connection refused");
        assert_eq!(err.to_string(), "[CACHE_ERROR] Redis error: connection refused");
    }

    #[test]
    fn validation_error_converts_with_matching_code() {
        let err: DomainError = ValidationError::invalid_format("role", "unknown speaker").into();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.details.get("field"), Some(&"role".to_string()));
    }
}
