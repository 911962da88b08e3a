//! Mock bearer-token validator for testing.
//!
//! Maps fixed tokens to users so HTTP tests can authenticate without
//! signing real JWTs.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new().with_test_user("token-1", "user-1");
//! let user = validator.validate("token-1").await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockSessionValidator {
    tokens: Arc<RwLock<HashMap<String, AuthenticatedUser>>>,
    /// Returned for every validation when set.
    force_error: Arc<RwLock<Option<AuthError>>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a generated test user.
    ///
    /// Blank ids are ignored.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let Ok(id) = UserId::new(&user_id) else {
            return self;
        };
        self.with_user(token, AuthenticatedUser::new(id))
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
