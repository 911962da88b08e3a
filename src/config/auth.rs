//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum shared-secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Bearer-token configuration (HS256 shared secret)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Secret used to verify access tokens
    #[serde(default)]
    pub jwt_secret: String,

    /// Required `iss` claim, if any
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 characters.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production
            && self.jwt_secret.chars().count() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ValidationError::JwtSecretTooShort {
                min: MIN_PRODUCTION_SECRET_LEN,
            });
        }
        Ok(())
    }
}
