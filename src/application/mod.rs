//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The orchestrator handles the write path of the conversation; the
//! conversation handlers cover initialization, listing, fetch and deletion.

mod error;
pub mod handlers;

pub use error::IntakeError;
pub use handlers::{
    ConversationOrchestrator, DeleteConversationCommand, DeleteConversationHandler,
    DeleteConversationResult, DeleteRecordCommand, DeleteRecordHandler, GetConversationHandler,
    GetConversationQuery, InitializeSessionCommand, InitializeSessionHandler,
    InitializeSessionResult, ListConversationsHandler, ListConversationsQuery, SendMessageCommand,
    SendMessageResult, SessionLocks, DEFAULT_TOP_K,
};
