//! Retrieval port - similarity search over reference cases.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One reference document with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedCase {
    pub content: String,
    pub score: f32,
}

impl RetrievedCase {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
        }
    }
}

/// Retrieval failures. The orchestrator treats every variant as zero matches.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),

    #[error("retrieval timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("malformed retrieval response: {0}")]
    Parse(String),
}

/// Similarity search port.
///
/// # Contract
///
/// - Results are ordered by descending score
/// - At most `top_k` results
/// - An empty result is a success, not an error
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedCase>, RetrievalError>;
}

/// Orders by descending score and keeps the best `top_k`.
pub fn rank(mut cases: Vec<RetrievedCase>, top_k: usize) -> Vec<RetrievedCase> {
    cases.sort_by(|a, b| b.score.total_cmp(&a.score));
    cases.truncate(top_k);
    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_orders_descending_and_truncates() {
        let ranked = rank(
            vec![
                RetrievedCase::new("low", 0.1),
                RetrievedCase::new("high", 0.9),
                RetrievedCase::new("mid", 0.5),
            ],
            2,
        );

        let contents: Vec<_> = ranked.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["high", "mid"]);
    }

    #[test]
    fn retrieval_client_is_object_safe() {
        fn _accepts_dyn(_client: &dyn RetrievalClient) {}
    }
}
