//! Response wrappers shared by all endpoints

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// `{"success": bool, "data": T, "message": "..."}` wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload.
    ///
    /// # Errors
    /// `ApiError::DecodingError` when the envelope carries no `data`.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or_else(|| {
            ApiError::DecodingError(
                self.message.unwrap_or_else(|| "response envelope has no data".to_string()),
            )
        })
    }
}

/// Error body returned with non-2xx responses. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl ErrorBody {
    /// First non-blank of `error` then `message`.
    pub fn best_message(&self) -> Option<&str> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|m| !m.is_empty())
    }
}

/// Acknowledgement without payload (`{"success": true, "message": "..."}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
