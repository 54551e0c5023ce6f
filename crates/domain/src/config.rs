//! Configuration structures
//!
//! Every section has serde defaults so partial TOML/JSON files are accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_UNIT_MS, DEFAULT_BASE_URL, DEFAULT_KEYCHAIN_ACCOUNT,
    DEFAULT_KEYCHAIN_SERVICE, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_RETRY_DELAY_SECS,
    DEFAULT_PLATFORM, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RESOURCE_TIMEOUT_SECS,
};
use crate::errors::{BullboardError, Result};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    /// Returns `BullboardError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url).map_err(|e| {
            BullboardError::Config(format!("Invalid base URL '{}': {}", self.api.base_url, e))
        })?;

        if self.api.request_timeout_secs == 0 || self.api.resource_timeout_secs == 0 {
            return Err(BullboardError::Config("Timeouts must be greater than 0".to_string()));
        }

        if self.retry.max_attempts == 0 {
            return Err(BullboardError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.retry.base <= 1.0 {
            return Err(BullboardError::Config(
                "retry base must be greater than 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL without trailing path (e.g. "https://api.bullboard.app")
    pub base_url: String,
    /// Platform tag sent in `X-Platform`
    pub platform: String,
    /// App version sent in `X-App-Version`
    pub app_version: String,
    /// Per-attempt timeout
    pub request_timeout_secs: u64,
    /// Upper bound for a whole transfer, applied on the HTTP client
    pub resource_timeout_secs: u64,
}

impl ApiConfig {
    /// Per-attempt timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Client-wide resource timeout as a `Duration`
    pub fn resource_timeout(&self) -> Duration {
        Duration::from_secs(self.resource_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            resource_timeout_secs: DEFAULT_RESOURCE_TIMEOUT_SECS,
        }
    }
}

/// Retry/backoff settings for transport failures and 5xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Default attempts per request (initial try + retries)
    pub max_attempts: u32,
    /// Exponential base
    pub base: f64,
    /// Delay unit in milliseconds; delay(n) = unit * base^n
    pub unit_ms: u64,
    /// Ceiling for a single delay; `None` leaves growth uncapped
    pub max_delay_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base: DEFAULT_BACKOFF_BASE,
            unit_ms: DEFAULT_BACKOFF_UNIT_MS,
            max_delay_secs: Some(DEFAULT_MAX_RETRY_DELAY_SECS),
        }
    }
}

/// Token persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Keychain service name (e.g. "Bullboard.api")
    pub keychain_service: String,
    /// Keychain account name
    pub keychain_account: String,
    /// Path of the token refresh endpoint
    pub refresh_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            keychain_account: DEFAULT_KEYCHAIN_ACCOUNT.to_string(),
            refresh_path: crate::constants::paths::AUTH_REFRESH.to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.api.request_timeout(), Duration::from_secs(20));
        assert_eq!(config.auth.refresh_path, "/api/v1/auth/refresh");
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(BullboardError::Config(_))));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(BullboardError::Config(_))));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"base_url": "http://localhost:8080"}}"#).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.platform, "ios");
        assert_eq!(config.retry, RetryConfig::default());
    }
}
