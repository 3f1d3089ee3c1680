//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SALESCOPE_*)
//! 2. TOML config file (if SALESCOPE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SALESCOPE_*)
/// 2. TOML config file (if SALESCOPE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path to SQLite cache database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Freshness window for cached analyses, in days.
    #[serde(default = "default_cache_expiration_days")]
    pub cache_expiration_days: i64,

    /// OpenAI-compatible API key.
    ///
    /// Required only when an analysis actually reaches the AI call.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Model identifier for insight extraction.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// User-Agent string for outbound page fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Page fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum bytes to fetch per page.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Character budget for extracted page text sent to the AI.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// HMAC secret for signing access tokens.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Access token lifetime in minutes.
    #[serde(default = "default_token_expire_minutes")]
    pub token_expire_minutes: i64,

    /// Credentials accepted by the login endpoint.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./salescope-cache.sqlite")
}

fn default_cache_expiration_days() -> i64 {
    7
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_openai_model() -> String {
    "gpt-4.1-mini".into()
}

fn default_user_agent() -> String {
    "salescope/0.1".into()
}

fn default_fetch_timeout_ms() -> u64 {
    15_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_text_chars() -> usize {
    10_000
}

fn default_secret_key() -> String {
    "dev-only-secret-change-me".into()
}

fn default_token_expire_minutes() -> i64 {
    60 * 24 * 7 // 7 days
}

fn default_admin_username() -> String {
    "vendas".into()
}

fn default_admin_password() -> String {
    "supersecret".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            db_path: default_db_path(),
            cache_expiration_days: default_cache_expiration_days(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_model: default_openai_model(),
            user_agent: default_user_agent(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_text_chars: default_max_text_chars(),
            secret_key: default_secret_key(),
            token_expire_minutes: default_token_expire_minutes(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest/tokio.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Freshness window as a chrono Duration.
    pub fn expiration_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.cache_expiration_days)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SALESCOPE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SALESCOPE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that an API key is available (deferred until an analysis needs it).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the OpenAI API key is not set.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "openai_api_key".into(),
            hint: "Set SALESCOPE_OPENAI_API_KEY environment variable".into(),
        })
    }
}
