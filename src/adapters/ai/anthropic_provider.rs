//! Anthropic Provider - Implementation of AIProvider for Anthropic's Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-3-sonnet-20240229")
//!     .with_timeout(Duration::from_secs(120));
//!
//! let provider = AnthropicProvider::new(config)?;
//! ```
//!
//! One HTTP request per completion. Failures are mapped to `AIError` and
//! returned; nothing here retries.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    TokenUsage,
};

/// Default model for statement generation.
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Used when a request does not set `max_tokens`.
const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    api_key: Secret<String>,
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the HTTP client cannot be built
    pub fn new(config: AnthropicConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to Anthropic's format.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| AnthropicMessage {
                role: match msg.role {
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect();

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let anthropic_request = self.to_anthropic_request(request);

        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), error_body));
        }

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(into_completion(anthropic_response))
    }
}

#[async_trait]
impl AIProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        tracing::debug!(
            trace_id = %request.metadata.trace_id,
            session_id = %request.metadata.session_id,
            model = %self.config.model,
            "Sending completion request"
        );
        let response = self.send_request(&request).await?;
        self.parse_response(response).await
    }
}

/// Maps a non-success status to an error.
fn error_for_status(status: u16, error_body: String) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(&error_body)),
        400 => AIError::InvalidRequest(error_body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, error_body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, error_body)),
    }
}

/// Pulls "try again in Ns" out of a rate limit message. Defaults to 60.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let msg = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let rest = &msg[msg.find("try again in ")? + 13..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(60)
}

fn into_completion(response: AnthropicResponse) -> CompletionResponse {
    let content = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    let finish_reason = match response.stop_reason.as_deref() {
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Stop,
    };

    CompletionResponse {
        content,
        usage: TokenUsage::new(response.usage.input_tokens, response.usage.output_tokens),
        model: response.model,
        finish_reason,
    }
}

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}
