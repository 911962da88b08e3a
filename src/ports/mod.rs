//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SessionStore` - Live session turn histories keyed by (user, session)
//! - `IntakeRecordRepository` - Finalized records with soft delete
//!
//! ## Collaborator Ports
//!
//! - `RetrievalClient` - Similarity search over reference cases
//! - `GenerationClient` - Document generation from answers and context
//! - `AIProvider` - Raw LLM completion used by the generator
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - Bearer token verification

mod ai_provider;
mod generation_client;
mod intake_record_repository;
mod retrieval_client;
mod session_store;
mod session_validator;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, TokenUsage,
};
pub use generation_client::{GenerationClient, GenerationContext, GenerationError};
pub use intake_record_repository::IntakeRecordRepository;
pub use retrieval_client::{rank, RetrievalClient, RetrievalError, RetrievedCase};
pub use session_store::SessionStore;
pub use session_validator::SessionValidator;
