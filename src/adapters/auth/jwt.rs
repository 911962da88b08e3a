//! HS256 bearer-token validator.
//!
//! Tokens are issued by the account service with a shared secret. The
//! identity claim is `userId`; `sub` is accepted when `userId` is absent.
//!
//! # Configuration
//!
//! ```ignore
//! let validator = JwtSessionValidator::new(JwtConfig::new(secret).with_issuer("accounts"));
//! ```

use async_trait::async_trait;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::SessionValidator;

/// Shared-secret JWT settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Secret<String>,
    /// Required `iss` claim, when set.
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: i64,
}

impl AccessClaims {
    /// Claims for `user_id` expiring `ttl_secs` from now.
    pub fn for_user(user_id: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            user_id: Some(user_id.into()),
            sub: None,
            iss: None,
            exp: Timestamp::now().as_datetime().timestamp() + ttl_secs,
        }
    }

    fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.sub.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// `SessionValidator` for HS256-signed access tokens.
pub struct JwtSessionValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            config,
            decoding_key,
            validation,
        }
    }

    /// Signs claims with the configured secret.
    ///
    /// Used by tests and local tooling to mint tokens the validator accepts.
    pub fn issue(&self, claims: &AccessClaims) -> Result<String, AuthError> {
        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.config.issuer.clone();
        }
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::service_unavailable(format!("Failed to sign token: {}", e)))
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            },
        )?;

        let claims = data.claims;
        let subject = claims.subject().ok_or_else(|| {
            tracing::warn!("Token has no user identity claim");
            AuthError::InvalidToken
        })?;
        let id = UserId::new(subject).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(id))
    }
}
