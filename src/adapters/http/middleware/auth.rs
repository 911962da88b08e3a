//! Bearer-token middleware and the `RequireAuth` extractor.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser in extensions
//!                                      ↓
//!                              Handler → RequireAuth reads it back
//! ```
//!
//! The middleware only knows the `SessionValidator` port, so the JWT
//! validator and the mock used in tests plug in the same way.
//!
//! # Example
//!
//! ```ignore
//! let validator: Arc<dyn SessionValidator> = Arc::new(MockSessionValidator::new());
//!
//! let app = Router::new()
//!     .route("/api/chat/init", post(init_session))
//!     .layer(middleware::from_fn_with_state(validator, auth_middleware));
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Validates the bearer token and injects the caller into request extensions.
///
/// A request without a token passes through untouched; `RequireAuth` turns
/// that into a 401 at the handler. A token that fails validation is rejected
/// here.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(&e),
    }
}

fn auth_error_response(error: &AuthError) -> Response {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!(error = %msg, "Auth service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
    };

    (
        status,
        Json(serde_json::json!({
            "code": "AUTH_ERROR",
            "message": message,
        })),
    )
        .into_response()
}

/// Extractor that requires an authenticated caller.
///
/// Rejects with 401 when the middleware did not inject a user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "code": "UNAUTHENTICATED",
                    "message": "Authentication required",
                })),
            )
                .into_response(),
        }
    }
}
