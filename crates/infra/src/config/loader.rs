//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If the base URL is not set, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! Whatever the source, the result is checked with [`Config::validate`].
//!
//! ## Environment Variables
//! - `BULLBOARD_API_BASE_URL`: API base URL (required)
//! - `BULLBOARD_APP_VERSION`: Value sent in `X-App-Version`
//! - `BULLBOARD_PLATFORM`: Value sent in `X-Platform`
//! - `BULLBOARD_REQUEST_TIMEOUT_SECS`: Per-attempt timeout
//! - `BULLBOARD_RESOURCE_TIMEOUT_SECS`: Whole-transfer timeout
//! - `BULLBOARD_MAX_ATTEMPTS`: Default attempts per request
//! - `BULLBOARD_RETRY_MAX_DELAY_SECS`: Backoff ceiling (`0` or `none` disables it)
//! - `BULLBOARD_KEYCHAIN_SERVICE`: Keychain service name
//! - `BULLBOARD_LOG_LEVEL`: Default log filter
//! - `BULLBOARD_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` or `./bullboard.{json,toml}` (current working directory)
//! 2. `../config.{json,toml}` and `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use bullboard_domain::{BullboardError, Config, Result};

const ENV_BASE_URL: &str = "BULLBOARD_API_BASE_URL";
const ENV_APP_VERSION: &str = "BULLBOARD_APP_VERSION";
const ENV_PLATFORM: &str = "BULLBOARD_PLATFORM";
const ENV_REQUEST_TIMEOUT: &str = "BULLBOARD_REQUEST_TIMEOUT_SECS";
const ENV_RESOURCE_TIMEOUT: &str = "BULLBOARD_RESOURCE_TIMEOUT_SECS";
const ENV_MAX_ATTEMPTS: &str = "BULLBOARD_MAX_ATTEMPTS";
const ENV_RETRY_MAX_DELAY: &str = "BULLBOARD_RETRY_MAX_DELAY_SECS";
const ENV_KEYCHAIN_SERVICE: &str = "BULLBOARD_KEYCHAIN_SERVICE";
const ENV_LOG_LEVEL: &str = "BULLBOARD_LOG_LEVEL";
const ENV_LOG_JSON: &str = "BULLBOARD_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (after reading `.env`).
/// If the required variable is missing or a value is invalid, falls back to
/// loading from a config file.
///
/// # Errors
/// Returns `BullboardError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `BULLBOARD_API_BASE_URL` is required; unset optional variables keep
/// their defaults.
///
/// # Errors
/// Returns `BullboardError::Config` if the base URL is missing, a value does
/// not parse, or the result fails validation.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var(ENV_BASE_URL)?;
    if let Some(version) = env_opt(ENV_APP_VERSION) {
        config.api.app_version = version;
    }
    if let Some(platform) = env_opt(ENV_PLATFORM) {
        config.api.platform = platform;
    }
    if let Some(secs) = env_parse::<u64>(ENV_REQUEST_TIMEOUT)? {
        config.api.request_timeout_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>(ENV_RESOURCE_TIMEOUT)? {
        config.api.resource_timeout_secs = secs;
    }
    if let Some(attempts) = env_parse::<u32>(ENV_MAX_ATTEMPTS)? {
        config.retry.max_attempts = attempts;
    }
    if let Some(raw) = env_opt(ENV_RETRY_MAX_DELAY) {
        config.retry.max_delay_secs = parse_max_delay(&raw)?;
    }
    if let Some(service) = env_opt(ENV_KEYCHAIN_SERVICE) {
        config.auth.keychain_service = service;
    }
    if let Some(level) = env_opt(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    config.logging.json = env_bool(ENV_LOG_JSON, config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BullboardError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BullboardError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BullboardError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BullboardError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BullboardError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BullboardError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BullboardError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("bullboard.json"),
        dir.join("bullboard.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        BullboardError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| BullboardError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

fn parse_max_delay(raw: &str) -> Result<Option<u64>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match raw.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(secs) => Ok(Some(secs)),
        Err(e) => Err(BullboardError::Config(format!("Invalid value for {ENV_RETRY_MAX_DELAY}: {e}"))),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        ENV_BASE_URL,
        ENV_APP_VERSION,
        ENV_PLATFORM,
        ENV_REQUEST_TIMEOUT,
        ENV_RESOURCE_TIMEOUT,
        ENV_MAX_ATTEMPTS,
        ENV_RETRY_MAX_DELAY,
        ENV_KEYCHAIN_SERVICE,
        ENV_LOG_LEVEL,
        ENV_LOG_JSON,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("BB_TEST_BOOL_YES", "YES");
        std::env::set_var("BB_TEST_BOOL_OFF", "off");
        std::env::remove_var("BB_TEST_BOOL_MISSING");

        assert!(env_bool("BB_TEST_BOOL_YES", false));
        assert!(!env_bool("BB_TEST_BOOL_OFF", true));
        assert!(env_bool("BB_TEST_BOOL_MISSING", true));

        std::env::remove_var("BB_TEST_BOOL_YES");
        std::env::remove_var("BB_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://staging.bullboard.app");
        std::env::set_var(ENV_APP_VERSION, "2.4.1");
        std::env::set_var(ENV_PLATFORM, "android");
        std::env::set_var(ENV_REQUEST_TIMEOUT, "10");
        std::env::set_var(ENV_RESOURCE_TIMEOUT, "15");
        std::env::set_var(ENV_MAX_ATTEMPTS, "5");
        std::env::set_var(ENV_RETRY_MAX_DELAY, "none");
        std::env::set_var(ENV_KEYCHAIN_SERVICE, "Bullboard.staging");
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        std::env::set_var(ENV_LOG_JSON, "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.api.base_url, "https://staging.bullboard.app");
        assert_eq!(config.api.app_version, "2.4.1");
        assert_eq!(config.api.platform, "android");
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.api.resource_timeout_secs, 15);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.max_delay_secs, None);
        assert_eq!(config.auth.keychain_service, "Bullboard.staging");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_only_base_url_keeps_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.retry, Config::default().retry);
        assert_eq!(config.api.platform, "ios");
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BullboardError::Config(msg) if msg.contains(ENV_BASE_URL)));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");
        std::env::set_var(ENV_MAX_ATTEMPTS, "three");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(BullboardError::Config(msg)) if msg.contains(ENV_MAX_ATTEMPTS)));
    }

    #[test]
    fn test_load_from_env_rejects_zero_attempts() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");
        std::env::set_var(ENV_MAX_ATTEMPTS, "0");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(BullboardError::Config(_))));
    }

    #[test]
    fn test_load_from_file_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "api": {{ "base_url": "https://api.example.test", "request_timeout_secs": 5 }},
                "retry": {{ "max_attempts": 4 }}
            }}"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.test");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.auth, Config::default().auth);
    }

    #[test]
    fn test_load_from_file_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://api.example.test"
platform = "android"

[retry]
max_delay_secs = 10

[logging]
level = "warn"
json = true
"#
        )
        .unwrap();

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.platform, "android");
        assert_eq!(config.retry.max_delay_secs, Some(10));
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/bullboard.toml")));
        assert!(matches!(result, Err(BullboardError::Config(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_load_from_file_invalid_values_fail_validation() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "api": {{ "base_url": "not a url" }} }}"#).unwrap();

        assert!(load_from_file(Some(file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("yaml");
        let result = parse_config("api: {}", &path);
        assert!(matches!(result, Err(BullboardError::Config(msg)) if msg.contains("yaml")));
    }

    #[test]
    fn test_parse_max_delay() {
        assert_eq!(parse_max_delay("45").unwrap(), Some(45));
        assert_eq!(parse_max_delay("0").unwrap(), None);
        assert_eq!(parse_max_delay("NONE").unwrap(), None);
        assert!(parse_max_delay("soon").is_err());
    }
}
