//! HTTP routes for the chat endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    delete_conversation, delete_record, get_conversation, init_session, list_conversations,
    send_message, ChatHandlers,
};

/// Creates the chat router. Mounted under `/api/chat`.
pub fn chat_routes(handlers: ChatHandlers) -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/init", post(init_session))
        .route("/conversations", get(list_conversations))
        .route(
            "/conversations/:session_id",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/orders/:record_id", delete(delete_record))
        .with_state(handlers)
}
