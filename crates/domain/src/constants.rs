//! Application constants
//!
//! Centralized location for wire-level constants shared by the request
//! pipeline and the endpoint client.

// Header names
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_PLATFORM: &str = "X-Platform";
pub const HEADER_APP_VERSION: &str = "X-App-Version";
pub const HEADER_CACHE_CONTROL: &str = "Cache-Control";
pub const HEADER_PRAGMA: &str = "Pragma";

// Header values
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CACHE_CONTROL_BYPASS: &str = "no-cache, no-store";
pub const PRAGMA_NO_CACHE: &str = "no-cache";
pub const BEARER_PREFIX: &str = "Bearer ";

// Defaults
pub const DEFAULT_BASE_URL: &str = "https://api.bullboard.app";
pub const DEFAULT_PLATFORM: &str = "ios";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RESOURCE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;
pub const DEFAULT_BACKOFF_UNIT_MS: u64 = 1_000;
pub const DEFAULT_MAX_RETRY_DELAY_SECS: u64 = 30;
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Bullboard.api";
pub const DEFAULT_KEYCHAIN_ACCOUNT: &str = "main";

/// Fallback message when an error body carries nothing readable.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// REST paths of the Bullboard API.
pub mod paths {
    pub const AUTH_REGISTER: &str = "/api/v1/auth/register";
    pub const AUTH_VERIFY: &str = "/api/v1/auth/verify";
    pub const AUTH_RESEND: &str = "/api/v1/auth/resend";
    pub const AUTH_REFRESH: &str = "/api/v1/auth/refresh";

    pub const QUIZ_QUESTIONS: &str = "/api/v1/quiz/questions";
    pub const QUIZ_SUBMIT: &str = "/api/v1/quiz/submit";
    pub const QUIZ_STATUS: &str = "/api/v1/quiz/status";

    pub const MARKET_SYMBOLS: &str = "/api/v1/market/symbols";
    pub const MARKET_CANDLES: &str = "/api/v1/market/candles";
    pub const MARKET_QUOTES: &str = "/api/v1/market/quotes";
    pub const MARKET_SNAPSHOTS: &str = "/api/v1/market/snapshots";
    pub const MARKET_BARS: &str = "/api/v1/market/bars";

    pub const SOCIAL_SYMBOLS: &str = "/api/v1/social/symbols";
    pub const SOCIAL_COMMENTS: &str = "/api/v1/social/comments";
    pub const SOCIAL_USERS: &str = "/api/v1/social/users";
    pub const FORUM_THREADS: &str = "/api/v1/forum/threads";

    pub const PROFILE: &str = "/api/v1/profile";
    pub const PROFILE_PHOTO: &str = "/api/v1/profile/photo";
}
