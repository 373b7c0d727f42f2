//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SOUK_API_BASE_URL` - Base URL of the remote catalog/accounts API
//! - `SOUK_ORDER_WEBHOOK_URL` - Order sink webhook (spreadsheet endpoint)
//! - `SOUK_DATA_DIR` - Directory for the local key-value store
//!
//! ## Optional
//! - `SOUK_HOST` - Bind address (default: 127.0.0.1)
//! - `SOUK_PORT` - Listen port (default: 3000)
//! - `SOUK_DEFAULT_LANG` - Interface language fallback (default: fr)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use souk_core::Lang;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct SoukConfig {
    /// Base URL of the remote catalog/accounts API
    pub api_base_url: Url,
    /// Order sink webhook URL (not owned by this system)
    pub order_webhook_url: Url,
    /// Directory backing the local key-value store
    pub data_dir: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Interface language used when no preference is stored
    pub default_lang: Lang,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl SoukConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_url("SOUK_API_BASE_URL", &get_required_env("SOUK_API_BASE_URL")?)?;
        let order_webhook_url = parse_url(
            "SOUK_ORDER_WEBHOOK_URL",
            &get_required_env("SOUK_ORDER_WEBHOOK_URL")?,
        )?;
        let data_dir = PathBuf::from(get_required_env("SOUK_DATA_DIR")?);

        let host = get_env_or_default("SOUK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUK_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SOUK_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SOUK_PORT".to_string(), e.to_string()))?;

        let default_lang = Lang::from_tag(&get_env_or_default("SOUK_DEFAULT_LANG", "fr"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_base_url,
            order_webhook_url,
            data_dir,
            host,
            port,
            default_lang,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
