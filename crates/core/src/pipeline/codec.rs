//! Request encoding and response decoding
//!
//! `RequestCodec` turns a [`RequestSpec`] into a [`WireRequest`] (URL,
//! headers, JSON body, timeout, cache policy) and maps raw response bodies
//! back to typed values or [`ApiError`]s. It performs no I/O.

use std::collections::BTreeMap;
use std::time::Duration;

use bullboard_domain::constants::{
    BEARER_PREFIX, CACHE_CONTROL_BYPASS, CONTENT_TYPE_JSON, GENERIC_ERROR_MESSAGE,
    HEADER_ACCEPT, HEADER_APP_VERSION, HEADER_AUTHORIZATION, HEADER_CACHE_CONTROL,
    HEADER_CONTENT_TYPE, HEADER_PLATFORM, HEADER_PRAGMA, PRAGMA_NO_CACHE,
};
use bullboard_domain::{ApiConfig, ApiError, ErrorBody, HttpMethod, RequestSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::outcome::TransportFailure;

/// Live market data endpoints: `/market/{quotes|snapshots|bars|candles}`,
/// optionally under an `/api/vN` prefix.
static LIVE_MARKET_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:/api/v\d+)?/market/(?:quotes|snapshots|bars|candles)(?:[/?#]|$)")
        .expect("LIVE_MARKET_PATH should compile - this is a bug")
});

/// Caching decision made at encode time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Let the HTTP stack apply its normal caching rules
    #[default]
    Default,
    /// Ask every cache layer for fresh data
    BypassCache,
}

impl CachePolicy {
    /// Bypass caches for live market data, default otherwise
    pub fn for_path(path: &str) -> Self {
        if is_live_market_path(path) {
            Self::BypassCache
        } else {
            Self::Default
        }
    }
}

/// Whether `path` addresses time-sensitive market data
pub fn is_live_market_path(path: &str) -> bool {
    LIVE_MARKET_PATH.is_match(path)
}

/// Fully encoded request, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL (base URL + path)
    pub url: Url,
    /// Header name to value, ordered for deterministic encoding
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON body; always `None` for GET
    pub body: Option<Vec<u8>>,
    /// Per-attempt timeout the transport must apply
    pub timeout: Duration,
    pub cache_policy: CachePolicy,
}

impl WireRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether an `Authorization` header is present
    pub fn has_authorization(&self) -> bool {
        self.header(HEADER_AUTHORIZATION).is_some()
    }
}

/// Builds wire requests and decodes responses for one API base URL
#[derive(Debug, Clone)]
pub struct RequestCodec {
    base_url: String,
    platform: String,
    app_version: String,
    request_timeout: Duration,
}

impl RequestCodec {
    /// Create a codec from API settings.
    ///
    /// # Errors
    /// `ApiError::InvalidUrl` if the base URL is not an absolute http(s) URL.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                config.base_url,
                parsed.scheme()
            )));
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            platform: config.platform.clone(),
            app_version: config.app_version.clone(),
            request_timeout: config.request_timeout(),
        })
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-attempt timeout attached to every request
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Join the base URL and an absolute API path (query string allowed).
    ///
    /// # Errors
    /// `ApiError::InvalidUrl` for empty or relative paths, paths containing
    /// whitespace or control characters, and joins that do not parse.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        if !path.starts_with('/') {
            return Err(ApiError::InvalidUrl(format!("path must start with '/': '{path}'")));
        }
        if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ApiError::InvalidUrl(format!("path contains invalid characters: '{path}'")));
        }

        let joined = format!("{}{}", self.base_url, path);
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Encode `spec` into a wire request.
    ///
    /// The bearer header is attached only when the request requires auth and a
    /// token is supplied. GET requests never carry a body. Identical inputs
    /// give identical output.
    ///
    /// # Errors
    /// `ApiError::InvalidUrl` from [`Self::url_for`]; `ApiError::DecodingError`
    /// if the body cannot be serialized.
    pub fn encode(&self, spec: &RequestSpec, token: Option<&str>) -> Result<WireRequest, ApiError> {
        let url = self.url_for(spec.path())?;
        let cache_policy = CachePolicy::for_path(spec.path());

        let mut headers = BTreeMap::new();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        headers.insert(HEADER_ACCEPT.to_string(), CONTENT_TYPE_JSON.to_string());
        headers.insert(HEADER_PLATFORM.to_string(), self.platform.clone());
        headers.insert(HEADER_APP_VERSION.to_string(), self.app_version.clone());

        if cache_policy == CachePolicy::BypassCache {
            headers.insert(HEADER_CACHE_CONTROL.to_string(), CACHE_CONTROL_BYPASS.to_string());
            headers.insert(HEADER_PRAGMA.to_string(), PRAGMA_NO_CACHE.to_string());
        }

        if spec.requires_auth() {
            if let Some(token) = token {
                headers.insert(HEADER_AUTHORIZATION.to_string(), format!("{BEARER_PREFIX}{token}"));
            }
        }

        let body = match spec.body() {
            Some(value) if spec.method().allows_body() => Some(
                serde_json::to_vec(value)
                    .map_err(|e| ApiError::DecodingError(format!("request body: {e}")))?,
            ),
            Some(_) => {
                debug!(path = %spec.path(), "Dropping body on GET request");
                None
            }
            None => None,
        };

        Ok(WireRequest {
            method: spec.method(),
            url,
            headers,
            body,
            timeout: self.request_timeout,
            cache_policy,
        })
    }

    /// Decode a 2xx body into `T`.
    ///
    /// 204/205 and blank bodies decode from JSON `null`, so `()` and
    /// `Option<_>` targets succeed on empty responses.
    ///
    /// # Errors
    /// `ApiError::DecodingError` when the body does not match `T`.
    pub fn decode_success<T: DeserializeOwned>(&self, status: u16, body: &[u8]) -> Result<T, ApiError> {
        let is_blank = body.iter().all(u8::is_ascii_whitespace);
        let decoded = if status == 204 || status == 205 || is_blank {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(body)
        };

        decoded.map_err(|e| ApiError::DecodingError(e.to_string()))
    }

    /// Message carried by an error body (`error`, then `message`), if any
    pub fn error_message(&self, body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.best_message().map(str::to_string))
    }

    /// Best-effort error text, falling back to a generic message
    pub fn decode_error(&self, body: &[u8]) -> String {
        self.error_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
    }

    /// Classify a non-2xx response.
    pub fn classify_failure(&self, status: u16, body: &[u8]) -> ApiError {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        if !(400..600).contains(&status) {
            return ApiError::InvalidResponse(format!("unexpected HTTP status {status}"));
        }

        match self.error_message(body) {
            Some(message) => ApiError::ServerErrorWithMessage { code: status, message },
            None if status < 500 => ApiError::ClientError(status),
            None => ApiError::ServerError(status),
        }
    }

    /// Classify a failure that produced no HTTP response.
    pub fn classify_transport(&self, failure: &TransportFailure) -> ApiError {
        ApiError::InvalidResponse(failure.to_string())
    }
}
