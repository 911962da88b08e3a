//! Case retrieval configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Which retrieval backend to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalProvider {
    Pinecone,
    #[default]
    InMemory,
}

/// Retrieval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub provider: RetrievalProvider,

    /// Number of cases passed to generation
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    pub pinecone_api_key: Option<String>,

    /// Index host, e.g. `https://cases-abc123.svc.pinecone.io`
    pub pinecone_index_host: Option<String>,

    #[serde(default = "default_dimensions")]
    pub embedding_dimensions: usize,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// YAML corpus for the in-memory provider
    pub corpus_path: Option<PathBuf>,
}

impl RetrievalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate retrieval configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.top_k == 0 || self.top_k > 100 {
            return Err(ValidationError::InvalidTopK);
        }
        if self.provider == RetrievalProvider::Pinecone {
            if self.pinecone_api_key.as_ref().map_or(true, |k| k.is_empty()) {
                return Err(ValidationError::MissingRequired("RETRIEVAL__PINECONE_API_KEY"));
            }
            let host = self
                .pinecone_index_host
                .as_deref()
                .ok_or(ValidationError::MissingRequired("RETRIEVAL__PINECONE_INDEX_HOST"))?;
            if !host.starts_with("https://") && !host.starts_with("http://") {
                return Err(ValidationError::InvalidIndexHost);
            }
            if self.embedding_dimensions == 0 {
                return Err(ValidationError::InvalidDimensions);
            }
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            provider: RetrievalProvider::default(),
            top_k: default_top_k(),
            pinecone_api_key: None,
            pinecone_index_host: None,
            embedding_dimensions: default_dimensions(),
            timeout_secs: default_timeout(),
            corpus_path: None,
        }
    }
}

fn default_top_k() -> usize {
    5
}

fn default_dimensions() -> usize {
    384
}

fn default_timeout() -> u64 {
    10
}
