//! AI Provider Port - Interface for raw LLM completions.
//!
//! The statement generator builds its prompt and hands it to an `AIProvider`.
//! The Anthropic wire format stays in the adapter.
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new(metadata)
//!     .with_system_prompt(SYSTEM_PROMPT)
//!     .with_message(MessageRole::User, prompt)
//!     .with_max_tokens(4000);
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, UserId};

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion. One attempt, no retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;
}

/// Prompt plus sampling settings for one completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// System text travels in `system_prompt`, never as a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Which intake a completion belongs to, for log correlation.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(user_id: UserId, session_id: SessionId, trace_id: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id,
            trace_id: trace_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// `Length` means the statement hit `max_tokens` and is cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
}

/// Any of these ends generation; the orchestrator saves the answers without a document.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
