//! AI Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `AnthropicProvider` - Anthropic Claude models over the Messages API
//! - `MockAIProvider` - Scripted replies for tests
//! - `StatementGenerator` - `GenerationClient` built on any `AIProvider`

mod anthropic_provider;
mod mock_provider;
mod statement_generator;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider, DEFAULT_MODEL};
pub use mock_provider::{MockAIProvider, MockError, DEFAULT_MOCK_CONTENT};
pub use statement_generator::{
    build_prompt, format_answers, format_cases, GenerationSettings, StatementGenerator,
    SYSTEM_PROMPT,
};
