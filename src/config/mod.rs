//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MITIGATION_INTAKE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mitigation_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod intake;
mod redis;
mod retrieval;
mod server;

pub use ai::AiConfig;
pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use intake::IntakeConfig;
pub use redis::RedisConfig;
pub use retrieval::{RetrievalConfig, RetrievalProvider};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// `database` and `redis` are optional; without them the service keeps
/// records and sessions in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Bearer-token verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Statement generation (Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Reference case retrieval
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Questionnaire behaviour
    #[serde(default)]
    pub intake: IntakeConfig,

    /// PostgreSQL record repository
    pub database: Option<DatabaseConfig>,

    /// Redis session store
    pub redis: Option<RedisConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MITIGATION_INTAKE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MITIGATION_INTAKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MITIGATION_INTAKE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MITIGATION_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.retrieval.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::ShortAnswerPolicy;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MITIGATION_INTAKE__AUTH__JWT_SECRET",
        "MITIGATION_INTAKE__AI__ANTHROPIC_API_KEY",
        "MITIGATION_INTAKE__SERVER__PORT",
        "MITIGATION_INTAKE__SERVER__ENVIRONMENT",
        "MITIGATION_INTAKE__DATABASE__URL",
        "MITIGATION_INTAKE__REDIS__URL",
        "MITIGATION_INTAKE__INTAKE__SHORT_ANSWER_POLICY",
        "MITIGATION_INTAKE__RETRIEVAL__TOP_K",
    ];

    fn set_minimal_env() {
        env::set_var("MITIGATION_INTAKE__AUTH__JWT_SECRET", "a-development-secret");
        env::set_var("MITIGATION_INTAKE__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.auth.jwt_secret, "a-development-secret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.database.is_none());
        assert!(config.redis.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_stores_are_loaded_when_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("MITIGATION_INTAKE__DATABASE__URL", "postgresql://test@localhost/intake"),
            ("MITIGATION_INTAKE__REDIS__URL", "redis://localhost:6379"),
        ])
        .unwrap();

        assert_eq!(config.database.unwrap().url, "postgresql://test@localhost/intake");
        assert_eq!(config.redis.unwrap().url, "redis://localhost:6379");
    }

    #[test]
    fn test_nested_values_are_parsed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("MITIGATION_INTAKE__SERVER__PORT", "3000"),
            ("MITIGATION_INTAKE__INTAKE__SHORT_ANSWER_POLICY", "reask_in_place"),
            ("MITIGATION_INTAKE__RETRIEVAL__TOP_K", "3"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.intake.short_answer_policy, ShortAnswerPolicy::ReaskInPlace);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("MITIGATION_INTAKE__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert_eq!(config.server.environment, Environment::Production);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort { .. })
        ));
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MITIGATION_INTAKE__AUTH__JWT_SECRET", "secret");
        let config = AppConfig::load();
        clear_env();

        assert_eq!(
            config.unwrap().validate(),
            Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
        );
    }
}
