//! In-memory retrieval over a small case corpus.
//!
//! Scores each case by word overlap with the query (cosine over word
//! sets). Good enough for development and tests; production uses Pinecone.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::ports::{rank, RetrievalClient, RetrievalError, RetrievedCase};

#[derive(Debug, Deserialize)]
struct CorpusFile {
    cases: Vec<CorpusCase>,
}

#[derive(Debug, Deserialize)]
struct CorpusCase {
    content: String,
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Token-overlap retriever.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRetrievalClient {
    cases: Vec<(String, HashSet<String>)>,
}

impl InMemoryRetrievalClient {
    pub fn new(cases: Vec<String>) -> Self {
        Self {
            cases: cases
                .into_iter()
                .map(|c| {
                    let t = tokens(&c);
                    (c, t)
                })
                .collect(),
        }
    }

    /// Parses a YAML corpus of the form `cases: [{content: ...}]`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RetrievalError> {
        let file: CorpusFile =
            serde_yaml::from_str(yaml).map_err(|e| RetrievalError::Parse(e.to_string()))?;
        Ok(Self::new(file.cases.into_iter().map(|c| c.content).collect()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[async_trait]
impl RetrievalClient for InMemoryRetrievalClient {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievedCase>, RetrievalError> {
        let query = tokens(text);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let scored = self
            .cases
            .iter()
            .filter_map(|(content, case_tokens)| {
                let overlap = query.intersection(case_tokens).count();
                if overlap == 0 {
                    return None;
                }
                let norm = ((query.len() * case_tokens.len()) as f32).sqrt();
                Some(RetrievedCase::new(content.clone(), overlap as f32 / norm))
            })
            .collect();

        Ok(rank(scored, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn corpus() -> InMemoryRetrievalClient {
        InMemoryRetrievalClient::new(vec![
            "Nurse suspended after medication error on night shift".into(),
            "Solicitor struck off for dishonesty with client funds".into(),
            "Pharmacist warned after dispensing error under pressure".into(),
        ])
    }

    #[tokio::test]
    async fn best_overlap_ranks_first() {
        let results = corpus()
            .query("I am a nurse and made a medication error", 5)
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert!(results[0].content.starts_with("Nurse suspended"));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn respects_top_k() {
        let results = corpus().query("error", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn no_overlap_is_empty_not_error() {
        let results = corpus().query("completely unrelated words", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn loads_corpus_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cases:\n  - content: \"Case one\"\n  - content: \"Case two\"").unwrap();

        let client = InMemoryRetrievalClient::from_yaml_file(file.path()).unwrap();
        assert_eq!(client.len(), 2);
    }

    #[test]
    fn malformed_corpus_is_parse_error() {
        let err = InMemoryRetrievalClient::from_yaml_str("cases: 3").unwrap_err();
        assert!(matches!(err, RetrievalError::Parse(_)));
    }
}
