//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("JWT secret must be at least {min} characters in production")]
    JwtSecretTooShort { min: usize },

    #[error("Temperature must be between 0.0 and 1.0")]
    InvalidTemperature,

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("top_k must be between 1 and 100")]
    InvalidTopK,

    #[error("Embedding dimensions must be greater than zero")]
    InvalidDimensions,

    #[error("Pinecone index host must be an http(s) URL")]
    InvalidIndexHost,
}
