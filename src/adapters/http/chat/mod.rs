//! Chat HTTP adapter.
//!
//! Exposes the intake conversation and its history over REST. Every route
//! needs an authenticated caller.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ConversationDetailResponse, ConversationListResponse, ConversationSummaryResponse,
    DeleteResponse, ErrorResponse, InitSessionResponse, MessageResponse, SendMessageRequest,
    SendMessageResponse,
};
pub use handlers::{ChatApiError, ChatHandlers};
pub use routes::chat_routes;
