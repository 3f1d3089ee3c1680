//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_expiration_days` is not in 1..=365
    /// - `fetch_timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `max_text_chars` is 0
    /// - `user_agent` or `secret_key` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_expiration_days < 1 || self.cache_expiration_days > 365 {
            return Err(ConfigError::Invalid {
                field: "cache_expiration_days".into(),
                reason: "must be between 1 and 365".into(),
            });
        }

        if self.fetch_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.fetch_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.max_text_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "max_text_chars".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.secret_key.is_empty() {
            return Err(ConfigError::Invalid { field: "secret_key".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
