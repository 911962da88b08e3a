//! Pinecone retrieval adapter.
//!
//! Queries a Pinecone index over its REST API. Query vectors come from
//! [`HashEmbedder`], a deterministic placeholder embedding with the same
//! dimensionality as the index, until a real embedding model is wired in.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{rank, RetrievalClient, RetrievalError, RetrievedCase};

/// Deterministic text-to-vector mapping.
///
/// Hashes the UTF-16 code units of the text with a 31-multiplier rolling
/// hash in wrapping 32-bit arithmetic, then spreads the hash across the
/// vector as `sin(hash + i) * 0.1`.
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn hash(text: &str) -> i32 {
        text.encode_utf16()
            .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let hash = f64::from(Self::hash(text));
        (0..self.dimensions)
            .map(|i| ((hash + i as f64).sin() * 0.1) as f32)
            .collect()
    }
}

/// Configuration for the Pinecone adapter.
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    api_key: Secret<String>,
    /// Index host, e.g. `https://regulatory-cases-abc123.svc.us-east-1.pinecone.io`.
    pub index_host: String,
    pub dimensions: usize,
    pub timeout: Duration,
}

impl PineconeConfig {
    pub fn new(api_key: impl Into<String>, index_host: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            index_host: index_host.into(),
            dimensions: 384,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `RetrievalClient` backed by a Pinecone index.
pub struct PineconeRetrievalClient {
    config: PineconeConfig,
    embedder: HashEmbedder,
    client: Client,
}

impl PineconeRetrievalClient {
    /// # Errors
    ///
    /// - `Unavailable` if the HTTP client cannot be built
    pub fn new(config: PineconeConfig) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RetrievalError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            embedder: HashEmbedder::new(config.dimensions),
            config,
            client,
        })
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.config.index_host.trim_end_matches('/'))
    }
}

#[async_trait]
impl RetrievalClient for PineconeRetrievalClient {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedCase>, RetrievalError> {
        let body = QueryRequest {
            vector: self.embedder.embed(text),
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(self.query_url())
            .header("Api-Key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    RetrievalError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Unavailable(format!(
                "Pinecone returned {}: {}",
                status, detail
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Parse(e.to_string()))?;

        tracing::debug!(matches = parsed.matches.len(), top_k, "Pinecone query complete");
        Ok(into_cases(parsed, top_k))
    }
}

fn into_cases(response: QueryResponse, top_k: usize) -> Vec<RetrievedCase> {
    let cases = response
        .matches
        .into_iter()
        .map(|m| {
            let content = m.metadata.and_then(|md| md.content).unwrap_or_default();
            RetrievedCase::new(content, m.score.unwrap_or(0.0))
        })
        .collect();
    rank(cases, top_k)
}

// ----- Pinecone API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[allow(dead_code)]
    id: Option<String>,
    score: Option<f32>,
    metadata: Option<MatchMetadata>,
}

#[derive(Debug, Deserialize)]
struct MatchMetadata {
    content: Option<String>,
}
