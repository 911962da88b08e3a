//! Intake conversation handlers.

mod send_message;
mod session_locks;

pub use send_message::{
    ConversationOrchestrator, SendMessageCommand, SendMessageResult, DEFAULT_TOP_K,
};
pub use session_locks::SessionLocks;
