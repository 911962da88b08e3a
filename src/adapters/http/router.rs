//! Top-level axum router.
//!
//! Mounts the authenticated chat routes under `/api/chat`, an open health
//! check, and the tracing, CORS and timeout layers.

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;

use super::chat::{chat_routes, ChatHandlers};
use super::middleware::{auth_middleware, AuthState};

/// Builds the full application router.
pub fn app_router(chat: ChatHandlers, validator: AuthState, server: &ServerConfig) -> Router {
    let chat = chat_routes(chat).layer(middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .nest("/api/chat", chat)
        .route("/api/health", get(health).with_state(Instant::now()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(build_cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(started): State<Instant>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "uptime_secs": started.elapsed().as_secs(),
    }))
}

/// Configured origins outside development; anything goes in development.
fn build_cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
