//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 shared-secret access tokens
//! - `mock` - Test implementation that doesn't require signed tokens

mod jwt;
mod mock;

pub use jwt::{AccessClaims, JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
