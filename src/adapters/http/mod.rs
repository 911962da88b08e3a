//! HTTP adapters - REST API implementations.
//!
//! - `chat` - intake conversation and history endpoints
//! - `middleware` - bearer-token authentication
//! - `router` - the assembled application router

pub mod chat;
pub mod middleware;
mod router;

pub use chat::{chat_routes, ChatApiError, ChatHandlers};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use router::app_router;
