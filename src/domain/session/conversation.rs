//! Unified view over live sessions and finalized records.

use crate::domain::foundation::{RecordId, SessionId, Timestamp};
use crate::domain::intake::{IntakeRecord, RecordStatus, Turn};

use super::live::LiveSession;

/// Either an in-progress session or a finalized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEntry {
    Live(LiveSession),
    Finalized(IntakeRecord),
}

/// Listing projection shared by both shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub session_id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub last_message_time: Timestamp,
    pub is_completed: bool,
    pub record_id: Option<RecordId>,
    pub status: Option<RecordStatus>,
}

impl ConversationEntry {
    pub fn session_id(&self) -> SessionId {
        match self {
            ConversationEntry::Live(session) => *session.id(),
            ConversationEntry::Finalized(record) => record.session_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        match self {
            ConversationEntry::Live(session) => session.is_done(),
            ConversationEntry::Finalized(_) => true,
        }
    }

    /// Chat-shaped history. Finalized records are rebuilt from their pairs.
    pub fn transcript(&self) -> Vec<Turn> {
        match self {
            ConversationEntry::Live(session) => session.turns().to_vec(),
            ConversationEntry::Finalized(record) => record.transcript(),
        }
    }

    pub fn summary(&self) -> ConversationSummary {
        match self {
            ConversationEntry::Live(session) => ConversationSummary {
                session_id: *session.id(),
                title: session.title(),
                message_count: session.message_count(),
                last_message_time: *session.updated_at(),
                is_completed: session.is_done(),
                record_id: None,
                status: None,
            },
            ConversationEntry::Finalized(record) => ConversationSummary {
                session_id: record.session_id,
                title: record.title.clone(),
                message_count: record.transcript().len(),
                last_message_time: record.updated_at,
                is_completed: true,
                record_id: Some(record.id),
                status: Some(record.status),
            },
        }
    }
}
