//! Generation port - turns answered questions into a document.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::intake::QaPair;

use super::{AIError, RetrievedCase};

/// Generation failures.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("language model request failed: {0}")]
    Provider(#[from] AIError),

    #[error("language model returned an empty document")]
    EmptyOutput,
}

/// Who the document is for, for tracing.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub user_id: UserId,
    pub session_id: SessionId,
}

/// Produces the finished document from answers and retrieved context.
///
/// Single attempt. Callers decide what to do on failure.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        ctx: &GenerationContext,
        pairs: &[QaPair],
        cases: &[RetrievedCase],
    ) -> Result<String, GenerationError>;
}
