//! Access-token refresh
//!
//! Exchanges the stored refresh token for a new access token and writes the
//! result back to the [`TokenStore`].
//!
//! Refreshes are serialized behind one async gate. A caller that reaches the
//! gate after another caller already rotated the token (the stored access
//! token no longer matches the one that was rejected) reuses that result
//! instead of calling the endpoint again, so a burst of concurrent 401s costs
//! a single network refresh.
//!
//! A failed refresh clears the store before the gate is released. Callers that
//! were queued behind it find the session already ended and get
//! [`RefreshError::SessionEnded`] instead of repeating the exchange.
//!
//! The exchange runs on a spawned task. Dropping the caller's future does not
//! interrupt a refresh between the endpoint response and the store write.

use std::sync::Arc;

use bullboard_domain::constants::paths;
use bullboard_domain::{RequestSpec, TokenPair};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::TokenStore;
use crate::pipeline::codec::RequestCodec;
use crate::pipeline::outcome::AttemptOutcome;
use crate::pipeline::ports::HttpTransport;

/// How a successful `refresh` call obtained a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call exchanged the refresh token and stored the new pair
    Refreshed,
    /// Another caller rotated the token while this one waited
    Reused,
}

/// Refresh failures. Any of them ends the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("No refresh token stored")]
    MissingRefreshToken,

    #[error("Refresh request could not be built: {0}")]
    InvalidRequest(String),

    #[error("Refresh rejected with status {0}")]
    Rejected(u16),

    #[error("Refresh transport failure: {0}")]
    Transport(String),

    #[error("Refresh response could not be decoded: {0}")]
    Decode(String),

    #[error("Token store failure: {0}")]
    Store(String),

    #[error("Refresh task aborted: {0}")]
    Aborted(String),

    /// A concurrent refresh already failed and ended the session
    #[error("Session already ended")]
    SessionEnded,
}

/// Token pair as returned by the refresh endpoint, bare or enveloped
#[derive(Deserialize)]
#[serde(untagged)]
enum RefreshResponse {
    Enveloped { data: TokenPair },
    Bare(TokenPair),
}

impl RefreshResponse {
    fn into_pair(self) -> TokenPair {
        match self {
            Self::Enveloped { data } | Self::Bare(data) => data,
        }
    }
}

/// Coordinates token refreshes for every request sharing a token store
///
/// Cheap to clone; clones share the gate.
#[derive(Clone)]
pub struct AuthRefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenStore>,
    codec: RequestCodec,
    refresh_path: String,
    gate: Mutex<()>,
}

impl AuthRefreshCoordinator {
    /// Coordinator posting to the default refresh path
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
        codec: RequestCodec,
    ) -> Self {
        Self::with_refresh_path(transport, tokens, codec, paths::AUTH_REFRESH)
    }

    /// Coordinator posting to `refresh_path`
    pub fn with_refresh_path(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenStore>,
        codec: RequestCodec,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                tokens,
                codec,
                refresh_path: refresh_path.into(),
                gate: Mutex::new(()),
            }),
        }
    }

    /// Path of the refresh endpoint
    pub fn refresh_path(&self) -> &str {
        &self.inner.refresh_path
    }

    /// Obtain a fresh access token after `stale_access` was rejected.
    ///
    /// # Errors
    /// `RefreshError::MissingRefreshToken` when no refresh token is stored;
    /// other variants when the exchange or the store write fails, in which
    /// case the store has been cleared. `RefreshError::SessionEnded` when an
    /// earlier caller's failure already cleared it. The refresh itself is
    /// never retried.
    pub async fn refresh(&self, stale_access: Option<&str>) -> Result<RefreshOutcome, RefreshError> {
        let inner = Arc::clone(&self.inner);
        let stale = stale_access.map(str::to_owned);

        tokio::spawn(async move { inner.run(stale).await })
            .await
            .map_err(|e| RefreshError::Aborted(e.to_string()))?
    }
}

impl Inner {
    #[instrument(skip_all, fields(path = %self.refresh_path))]
    async fn run(&self, stale_access: Option<String>) -> Result<RefreshOutcome, RefreshError> {
        let _gate = self.gate.lock().await;

        let current = self.tokens.credentials().await.map_err(|e| RefreshError::Store(e.to_string()))?;

        if stale_access.is_some() && current.is_empty() {
            debug!("Session ended by an earlier refresh failure");
            return Err(RefreshError::SessionEnded);
        }

        if let (Some(stale), Some(current_access)) =
            (stale_access.as_deref(), current.access_token.as_deref())
        {
            if stale != current_access {
                debug!("Access token already rotated by a concurrent refresh");
                return Ok(RefreshOutcome::Reused);
            }
        }

        match self.exchange(current.refresh_token).await {
            Ok(()) => Ok(RefreshOutcome::Refreshed),
            Err(err) => {
                if let Err(clear_err) = self.tokens.clear().await {
                    warn!(error = %clear_err, "Failed to clear token store after refresh failure");
                }
                Err(err)
            }
        }
    }

    async fn exchange(&self, refresh_token: Option<String>) -> Result<(), RefreshError> {
        let refresh_token = refresh_token.ok_or(RefreshError::MissingRefreshToken)?;

        let spec = RequestSpec::post(self.refresh_path.as_str())
            .public()
            .with_max_attempts(1)
            .with_body(json!({ "refresh_token": refresh_token }));
        let request = self
            .codec
            .encode(&spec, None)
            .map_err(|e| RefreshError::InvalidRequest(e.to_string()))?;

        let pair = match self.transport.send(request).await {
            AttemptOutcome::Success { status, body } => self.decode_pair(status, &body)?,
            AttemptOutcome::HttpFailure { status, .. } => {
                warn!(status, "Refresh endpoint rejected the refresh token");
                return Err(RefreshError::Rejected(status));
            }
            AttemptOutcome::TransportFailure(failure) => {
                warn!(error = %failure, "Refresh request failed");
                return Err(RefreshError::Transport(failure.to_string()));
            }
        };

        // Servers that do not rotate refresh tokens omit it; keep the old one.
        let next_refresh = pair.refresh_token.as_deref().unwrap_or(refresh_token.as_str());
        self.tokens
            .save_tokens(&pair.access_token, Some(next_refresh))
            .await
            .map_err(|e| RefreshError::Store(e.to_string()))?;

        info!(rotated_refresh = pair.refresh_token.is_some(), "Access token refreshed");
        Ok(())
    }

    fn decode_pair(&self, status: u16, body: &[u8]) -> Result<TokenPair, RefreshError> {
        let pair = self
            .codec
            .decode_success::<RefreshResponse>(status, body)
            .map_err(|e| RefreshError::Decode(e.to_string()))?
            .into_pair();

        if pair.access_token.trim().is_empty() {
            return Err(RefreshError::Decode("empty access token".to_string()));
        }
        Ok(pair)
    }
}
