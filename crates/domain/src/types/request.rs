//! Description of one logical API call

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_MAX_ATTEMPTS;

/// HTTP method supported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read; never carries a body
    Get,
    /// Create
    Post,
    /// Replace
    Put,
    /// Remove
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a JSON body may be attached
    pub fn allows_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical API call.
///
/// Built once per call through the consuming builder methods and only
/// borrowed by the executor afterwards, so retries and the post-refresh replay
/// all encode the same description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    path: String,
    method: HttpMethod,
    body: Option<Value>,
    requires_auth: bool,
    max_attempts: u32,
}

impl RequestSpec {
    /// Create an authenticated request with the default attempt budget.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            requires_auth: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Authenticated GET of `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Authenticated POST to `path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Authenticated PUT to `path`
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Authenticated DELETE of `path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Mark the request as public (no bearer token, no refresh on 401).
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Set whether a bearer token is required
    pub fn with_auth(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }

    /// Total attempts for retryable failures; values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Path relative to the base URL, query included
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether a bearer token must be attached
    pub fn requires_auth(&self) -> bool {
        self.requires_auth
    }

    /// Total attempts allowed for transport failures and 5xx (at least 1)
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_to_authenticated_with_default_budget() {
        let spec = RequestSpec::get("/api/v1/quiz/status");
        assert_eq!(spec.method(), HttpMethod::Get);
        assert!(spec.requires_auth());
        assert_eq!(spec.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert!(spec.body().is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let spec = RequestSpec::post("/api/v1/auth/register")
            .with_body(json!({"email": "a@b.c"}))
            .public()
            .with_max_attempts(5);

        assert_eq!(spec.path(), "/api/v1/auth/register");
        assert!(!spec.requires_auth());
        assert_eq!(spec.max_attempts(), 5);
        assert_eq!(spec.body(), Some(&json!({"email": "a@b.c"})));
    }

    #[test]
    fn max_attempts_never_below_one() {
        assert_eq!(RequestSpec::get("/x").with_max_attempts(0).max_attempts(), 1);
    }

    #[test]
    fn method_strings() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert!(!HttpMethod::Get.allows_body());
        assert!(HttpMethod::Put.allows_body());
    }
}
