//! HTTP DTOs for the chat endpoints.
//!
//! Field names are camelCase on the wire to match the web client.

use serde::{Deserialize, Serialize};

use crate::domain::intake::Turn;
use crate::domain::session::{ConversationEntry, ConversationSummary};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
    /// Raw turns as the client holds them. Entries are validated one by one.
    #[serde(default)]
    pub conversation: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTurn {
    role: String,
    content: String,
}

impl SendMessageRequest {
    /// Client history with malformed entries dropped.
    pub fn turns(&self) -> Vec<Turn> {
        self.conversation
            .iter()
            .flatten()
            .filter_map(|value| serde_json::from_value::<RawTurn>(value.clone()).ok())
            .filter_map(|raw| Turn::parse(&raw.role, &raw.content).ok())
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub response: String,
    pub session_id: String,
    pub is_final: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSessionResponse {
    pub session_id: String,
}

/// One row of the conversation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryResponse {
    pub session_id: String,
    pub title: String,
    pub message_count: usize,
    /// RFC 3339.
    pub last_message_time: String,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            session_id: summary.session_id.to_string(),
            title: summary.title,
            message_count: summary.message_count,
            last_message_time: summary.last_message_time.to_rfc3339(),
            is_completed: summary.is_completed,
            record_id: summary.record_id.map(|id| id.to_string()),
            status: summary.status.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummaryResponse>,
}

impl From<Vec<ConversationSummary>> for ConversationListResponse {
    fn from(summaries: Vec<ConversationSummary>) -> Self {
        Self {
            conversations: summaries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub role: String,
    pub content: String,
}

impl From<&Turn> for MessageResponse {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role().as_str().to_string(),
            content: turn.content().to_string(),
        }
    }
}

/// Full history of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetailResponse {
    pub session_id: String,
    pub is_completed: bool,
    pub messages: Vec<MessageResponse>,
}

impl From<ConversationEntry> for ConversationDetailResponse {
    fn from(entry: ConversationEntry) -> Self {
        Self {
            session_id: entry.session_id().to_string(),
            is_completed: entry.is_completed(),
            messages: entry.transcript().iter().map(Into::into).collect(),
        }
    }
}

/// Acknowledgement for delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
