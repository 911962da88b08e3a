//! Authenticated identity.
//!
//! `AuthenticatedUser` is what the core trusts once a `SessionValidator`
//! has accepted a bearer token. Sessions and records are keyed by its id.

use super::UserId;
use thiserror::Error;

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

impl AuthenticatedUser {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }
}

/// Why a bearer token was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Malformed, badly signed, wrong issuer, or missing an identity claim.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The validator is misconfigured or cannot sign.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
