//! Bearer-token validation port.
//!
//! The auth middleware strips `Bearer ` and hands the rest here. Whatever
//! comes back is the user every session and record lookup is scoped to.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Turns a raw bearer token into the user it speaks for.
///
/// Expired tokens yield `AuthError::TokenExpired`; anything else that fails
/// verification yields `AuthError::InvalidToken`.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    /// Treats the token itself as the user id.
    struct TokenIsUserId;

    #[async_trait]
    impl SessionValidator for TokenIsUserId {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            UserId::new(token)
                .map(AuthenticatedUser::new)
                .map_err(|_| AuthError::InvalidToken)
        }
    }

    #[tokio::test]
    async fn validators_are_usable_behind_a_shared_pointer() {
        let validator: std::sync::Arc<dyn SessionValidator> = std::sync::Arc::new(TokenIsUserId);

        assert_eq!(validator.validate("alice").await.unwrap().id.as_str(), "alice");
        assert_eq!(validator.validate(" ").await.unwrap_err(), AuthError::InvalidToken);
    }
}
