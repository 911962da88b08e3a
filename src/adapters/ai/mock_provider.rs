//! Scripted AI provider for tests.
//!
//! Replies are consumed in the order they were queued; once the script runs
//! out every call gets `DEFAULT_MOCK_CONTENT`. Every request is kept so tests
//! can inspect the prompt the generator built.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_error(MockError::Unavailable { message: "overloaded".into() })
//!     .with_response("Generated statement");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, TokenUsage,
};

/// Content returned once the script is exhausted.
pub const DEFAULT_MOCK_CONTENT: &str = "Mock response";

const MOCK_MODEL: &str = "mock-statement-model";

/// Cloning shares the script and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply { content: String, finish: FinishReason },
    Fail(MockError),
}

/// Failures a test can queue.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Scripted::Reply {
            content: content.into(),
            finish: FinishReason::Stop,
        })
    }

    /// Queues a reply that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        self.push(Scripted::Reply {
            content: content.into(),
            finish: FinishReason::Length,
        })
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.push(Scripted::Fail(error))
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    fn push(self, entry: Scripted) -> Self {
        lock(&self.script).push_back(entry);
        self
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let completion_tokens = request.max_tokens.unwrap_or(0).min(500);
        lock(&self.calls).push(request);

        let next = lock(&self.script).pop_front();
        match next {
            Some(Scripted::Fail(err)) => Err(err.into()),
            Some(Scripted::Reply { content, finish }) => Ok(CompletionResponse {
                content,
                usage: TokenUsage::new(100, completion_tokens),
                model: MOCK_MODEL.to_string(),
                finish_reason: finish,
            }),
            None => Ok(CompletionResponse {
                content: DEFAULT_MOCK_CONTENT.to_string(),
                usage: TokenUsage::new(100, completion_tokens),
                model: MOCK_MODEL.to_string(),
                finish_reason: FinishReason::Stop,
            }),
        }
    }
}
