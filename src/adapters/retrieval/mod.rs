//! Retrieval adapters.
//!
//! - `PineconeRetrievalClient` - Pinecone REST query with a placeholder embedding
//! - `InMemoryRetrievalClient` - token-overlap search over a local corpus

mod in_memory;
mod pinecone;

pub use in_memory::InMemoryRetrievalClient;
pub use pinecone::{HashEmbedder, PineconeConfig, PineconeRetrievalClient};
