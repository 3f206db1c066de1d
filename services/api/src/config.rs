//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. The upstream API key is the one exception:
//! it is re-read from the environment on every chat request (see `adapters::credentials`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub upload_dir: PathBuf,
    /// Fixed origin for upload URLs. When unset, the request's scheme and Host are used.
    pub public_base_url: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub upstream_timeout: Duration,
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server Settings ---
        let bind_address_str = match std::env::var("BIND_ADDRESS") {
            Ok(addr) => addr,
            Err(_) => {
                let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
                format!("0.0.0.0:{port}")
            }
        };
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = non_empty_var("CORS_ORIGIN");

        // --- Upload Settings ---
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));
        let public_base_url =
            non_empty_var("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string());

        // --- Upstream Completion Settings ---
        let api_base = non_empty_var("OPENAI_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let timeout_str =
            std::env::var("UPSTREAM_TIMEOUT_SECS").unwrap_or_else(|_| "60".to_string());
        let timeout_secs = timeout_str.parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            upload_dir,
            public_base_url,
            api_base,
            chat_model,
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_origin,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
