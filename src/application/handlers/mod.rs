//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversations;
pub mod intake;

pub use conversations::{
    DeleteConversationCommand, DeleteConversationHandler, DeleteConversationResult,
    DeleteRecordCommand, DeleteRecordHandler, GetConversationHandler, GetConversationQuery,
    InitializeSessionCommand, InitializeSessionHandler, InitializeSessionResult,
    ListConversationsHandler, ListConversationsQuery,
};
pub use intake::{
    ConversationOrchestrator, SendMessageCommand, SendMessageResult, SessionLocks, DEFAULT_TOP_K,
};
