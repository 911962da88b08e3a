//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::storage::DEFAULT_SESSION_TTL_SECS;

/// Redis configuration for the live session store
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default)]
    pub url: String,

    /// Seconds a live session survives without activity
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl RedisConfig {
    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
