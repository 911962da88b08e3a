//! Conversation query and command handlers.

mod delete_conversation;
mod delete_record;
mod get_conversation;
mod initialize_session;
mod list_conversations;

pub use delete_conversation::{
    DeleteConversationCommand, DeleteConversationHandler, DeleteConversationResult,
};
pub use delete_record::{DeleteRecordCommand, DeleteRecordHandler};
pub use get_conversation::{GetConversationHandler, GetConversationQuery};
pub use initialize_session::{
    InitializeSessionCommand, InitializeSessionHandler, InitializeSessionResult,
};
pub use list_conversations::{ListConversationsHandler, ListConversationsQuery};
