//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Bullboard operations outside the request pipeline
/// (configuration, token persistence, adapters).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BullboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Bullboard operations
pub type Result<T> = std::result::Result<T, BullboardError>;

/// Classified outcome of a failed API request.
///
/// This is the closed set of errors the request pipeline hands back to its
/// callers; every failure path (pre-flight checks, transport, HTTP status,
/// decoding, token refresh) ends in exactly one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ApiError {
    /// The request URL could not be built from the base URL and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No usable HTTP response was obtained.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Missing credentials, or credentials rejected after a refresh attempt.
    #[error("Unauthorized")]
    Unauthorized,

    /// 4xx response without a parseable error body.
    #[error("Client error (status {0})")]
    ClientError(u16),

    /// 5xx response without a parseable error body.
    #[error("Server error (status {0})")]
    ServerError(u16),

    /// Error response whose body carried a message.
    #[error("Server error (status {code}): {message}")]
    ServerErrorWithMessage { code: u16, message: String },

    /// The success body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    DecodingError(String),

    /// The reachability probe reported no connectivity.
    #[error("Network unavailable")]
    NetworkUnavailable,
}

impl ApiError {
    /// HTTP status associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::ClientError(code)
            | Self::ServerError(code)
            | Self::ServerErrorWithMessage { code, .. } => Some(*code),
            Self::InvalidUrl(_)
            | Self::InvalidResponse(_)
            | Self::DecodingError(_)
            | Self::NetworkUnavailable => None,
        }
    }

    /// Whether the pipeline would retry the attempt that produced this error.
    ///
    /// Only 5xx responses and failures without an HTTP response qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidResponse(_) | Self::ServerError(_) => true,
            Self::ServerErrorWithMessage { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// Whether this error ends the user session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Default user-facing text. The UI layer may localize by matching on the
    /// variant instead.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUrl(_) => "The request could not be created.".to_string(),
            Self::InvalidResponse(_) => "The server sent an invalid response.".to_string(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::ClientError(code) => format!("The request was rejected ({code})."),
            Self::ServerError(code) => format!("The server is having trouble ({code})."),
            Self::ServerErrorWithMessage { message, .. } => message.clone(),
            Self::DecodingError(_) => "The server response could not be read.".to_string(),
            Self::NetworkUnavailable => "No internet connection.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_variants() {
        assert_eq!(ApiError::Unauthorized.status_code(), Some(401));
        assert_eq!(ApiError::ClientError(404).status_code(), Some(404));
        assert_eq!(
            ApiError::ServerErrorWithMessage { code: 422, message: "bad".into() }.status_code(),
            Some(422)
        );
        assert_eq!(ApiError::NetworkUnavailable.status_code(), None);
        assert_eq!(ApiError::DecodingError("x".into()).status_code(), None);
    }

    #[test]
    fn retry_classification() {
        assert!(ApiError::ServerError(503).is_retryable());
        assert!(ApiError::InvalidResponse("timeout".into()).is_retryable());
        assert!(ApiError::ServerErrorWithMessage { code: 500, message: "x".into() }.is_retryable());
        assert!(!ApiError::ServerErrorWithMessage { code: 409, message: "x".into() }.is_retryable());
        assert!(!ApiError::ClientError(404).is_retryable());
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(!ApiError::NetworkUnavailable.is_retryable());
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ApiError::ServerErrorWithMessage { code: 400, message: "Symbol not found".into() };
        assert_eq!(err.user_message(), "Symbol not found");
        assert!(ApiError::Unauthorized.user_message().contains("sign in"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(ApiError::ClientError(404)).unwrap();
        assert_eq!(json["kind"], "client_error");
    }
}
