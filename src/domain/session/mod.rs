//! Session domain module.
//!
//! Live sessions hold the in-progress turn history. `ConversationEntry`
//! merges them with finalized records for listing and fetching.

mod conversation;
mod live;

pub use conversation::{ConversationEntry, ConversationSummary};
pub use live::{LiveSession, MAX_TITLE_CHARS, UNTITLED};
