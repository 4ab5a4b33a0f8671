//! Storefront cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `FF_API_BASE_URL` - Backend origin for `/api/cart` and `/api/orders`
//!   (default: `http://127.0.0.1:3000`)
//! - `FF_STORAGE_DIR` - Directory holding the persisted cart and credential
//!   (default: `.ff-storage`)
//! - `FF_SYNC_CART` - Push the cart to `/api/cart` after every change
//!   (default: false)
//! - `FF_REQUEST_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `FF_CURRENCY` - Currency for totals: PHP, USD, EUR, GBP, CAD, AUD
//!   (default: PHP)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use ff_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_STORAGE_DIR: &str = ".ff-storage";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront cart configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Directory for persisted client state
    pub storage_dir: PathBuf,
    /// Whether to push the cart to the backend after each change
    pub sync_cart: bool,
    /// Currency used to format totals
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Origin the endpoint paths are resolved against
    pub base_url: Url,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = get("FF_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| invalid("FF_API_BASE_URL", e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(
                "FF_API_BASE_URL",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let request_timeout = match get("FF_REQUEST_TIMEOUT_SECS") {
            Some(value) => parse_timeout(&value)
                .map_err(|reason| invalid("FF_REQUEST_TIMEOUT_SECS", reason))?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let sync_cart = match get("FF_SYNC_CART") {
            Some(value) => parse_bool(&value)
                .ok_or_else(|| invalid("FF_SYNC_CART", format!("'{value}' is not a boolean")))?,
            None => false,
        };

        let currency = match get("FF_CURRENCY") {
            Some(value) => value
                .parse::<CurrencyCode>()
                .map_err(|e| invalid("FF_CURRENCY", e.to_string()))?,
            None => CurrencyCode::default(),
        };

        let storage_dir = get("FF_STORAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout,
            },
            storage_dir,
            sync_cart,
            currency,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason)
}

/// Parse a boolean flag (`1/0`, `true/false`, `yes/no`, `on/off`).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a positive number of seconds.
fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs = value.trim().parse::<u64>().map_err(|e| e.to_string())?;
    if secs == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(Duration::from_secs(secs))
}
