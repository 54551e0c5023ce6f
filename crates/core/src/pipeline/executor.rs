//! Request execution: retries, token refresh and classification
//!
//! One call to [`RequestExecutor::execute`] runs a [`RequestSpec`] to a
//! decoded value or an [`ApiError`]:
//!
//! ```text
//! Idle -> Sending -> Succeeded
//!                 -> RetryWait -> Sending            (transport error / 5xx, attempts left)
//!                 -> AwaitingRefresh -> Sending      (401 on an authenticated request, once)
//!                 -> Failed                          (terminal 4xx, decode error, exhaustion)
//! ```
//!
//! Transitions are emitted as `tracing` events carrying a `state` field.

use std::sync::Arc;

use bullboard_common::resilience::RetryPolicy;
use bullboard_domain::constants::paths;
use bullboard_domain::{ApiError, BullboardError, RequestSpec};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::codec::RequestCodec;
use super::outcome::AttemptOutcome;
use super::ports::{HttpTransport, ReachabilityProbe};
use crate::session::ports::{NoopSessionObserver, SessionObserver, TokenStore};
use crate::session::refresh::{AuthRefreshCoordinator, RefreshError, RefreshOutcome};

/// Lifecycle states of one logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Not yet started
    Idle,
    /// An attempt is on the wire
    Sending,
    /// Sleeping before the next attempt
    RetryWait,
    /// Waiting for a token refresh before the replay
    AwaitingRefresh,
    /// Decoded a 2xx response
    Succeeded,
    /// Ended with a classified error
    Failed,
}

impl RequestState {
    /// Value of the `state` field in tracing events
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
            Self::RetryWait => "retry_wait",
            Self::AwaitingRefresh => "awaiting_refresh",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transition can follow
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Raw 2xx response handed to the decoder
struct RawSuccess {
    status: u16,
    body: Vec<u8>,
}

/// Runs request specs against the API
///
/// `Send + Sync`; share one instance behind an `Arc`.
pub struct RequestExecutor {
    codec: RequestCodec,
    transport: Arc<dyn HttpTransport>,
    reachability: Arc<dyn ReachabilityProbe>,
    tokens: Arc<dyn TokenStore>,
    refresher: AuthRefreshCoordinator,
    observer: Arc<dyn SessionObserver>,
    retry_policy: RetryPolicy,
}

impl RequestExecutor {
    /// Start wiring an executor
    pub fn builder() -> RequestExecutorBuilder {
        RequestExecutorBuilder::default()
    }

    /// Codec used to encode and decode requests
    pub fn codec(&self) -> &RequestCodec {
        &self.codec
    }

    /// Store the bearer token is read from
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Backoff applied between attempts
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Execute `spec` and decode the 2xx body into `T`.
    ///
    /// # Errors
    /// The classified failure; see [`ApiError`].
    #[instrument(skip(self, spec), fields(method = %spec.method(), path = %spec.path()))]
    pub async fn execute<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T, ApiError> {
        debug!(state = RequestState::Idle.as_str(), "Request started");

        let result = match self.run(spec).await {
            Ok(raw) => self.codec.decode_success::<T>(raw.status, &raw.body),
            Err(err) => Err(err),
        };

        match &result {
            Ok(_) => debug!(state = RequestState::Succeeded.as_str(), "Request succeeded"),
            Err(err) => info!(state = RequestState::Failed.as_str(), error = %err, "Request failed"),
        }
        result
    }

    async fn run(&self, spec: &RequestSpec) -> Result<RawSuccess, ApiError> {
        if !self.reachability.is_connected().await {
            warn!("Network unreachable, request not sent");
            return Err(ApiError::NetworkUnavailable);
        }
        self.codec.url_for(spec.path())?;

        let max_attempts = spec.max_attempts().max(1);
        let mut last_error = ApiError::InvalidResponse("no attempt was made".to_string());
        let mut attempt = 0;

        while attempt < max_attempts {
            let token = self.bearer_token(spec).await?;
            let request = self.codec.encode(spec, token.as_deref())?;

            debug!(state = RequestState::Sending.as_str(), attempt, "Sending request");
            match self.transport.send(request).await {
                AttemptOutcome::Success { status, body } => return Ok(RawSuccess { status, body }),
                AttemptOutcome::HttpFailure { status: 401, .. } if spec.requires_auth() => {
                    return self.refresh_and_replay(spec, token).await;
                }
                AttemptOutcome::HttpFailure { status, body } if status >= 500 => {
                    last_error = self.codec.classify_failure(status, &body);
                }
                AttemptOutcome::HttpFailure { status, body } => {
                    return Err(self.codec.classify_failure(status, &body));
                }
                AttemptOutcome::TransportFailure(failure) => {
                    warn!(attempt, error = %failure, "Transport failure");
                    last_error = self.codec.classify_transport(&failure);
                }
            }

            if attempt + 1 < max_attempts {
                let delay = self.retry_policy.delay(attempt);
                info!(
                    state = RequestState::RetryWait.as_str(),
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %last_error,
                    "Retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }

        warn!(attempts = max_attempts, error = %last_error, "Retries exhausted");
        Err(last_error)
    }

    /// Token to attach, or `Unauthorized` when an authenticated request has
    /// none. Public requests never read the store.
    async fn bearer_token(&self, spec: &RequestSpec) -> Result<Option<String>, ApiError> {
        if !spec.requires_auth() {
            return Ok(None);
        }

        match self.tokens.access_token().await {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                debug!("No access token stored for authenticated request");
                Err(ApiError::Unauthorized)
            }
            Err(err) => {
                warn!(error = %err, "Token store read failed");
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// One refresh, then exactly one replay whose outcome is final.
    async fn refresh_and_replay(
        &self,
        spec: &RequestSpec,
        stale_token: Option<String>,
    ) -> Result<RawSuccess, ApiError> {
        info!(state = RequestState::AwaitingRefresh.as_str(), "Access token rejected, refreshing");

        match self.refresher.refresh(stale_token.as_deref()).await {
            Ok(outcome) => {
                if outcome == RefreshOutcome::Refreshed {
                    self.observer.on_tokens_refreshed();
                }
            }
            Err(RefreshError::SessionEnded) => {
                debug!("Session already ended by a concurrent refresh failure");
                return Err(ApiError::Unauthorized);
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, forcing logout");
                self.force_logout().await;
                return Err(ApiError::Unauthorized);
            }
        }

        let token = self.bearer_token(spec).await?;
        let request = self.codec.encode(spec, token.as_deref())?;

        debug!(state = RequestState::Sending.as_str(), replay = true, "Replaying request");
        match self.transport.send(request).await {
            AttemptOutcome::Success { status, body } => Ok(RawSuccess { status, body }),
            AttemptOutcome::HttpFailure { status, body } => {
                Err(self.codec.classify_failure(status, &body))
            }
            AttemptOutcome::TransportFailure(failure) => Err(self.codec.classify_transport(&failure)),
        }
    }

    async fn force_logout(&self) {
        if let Err(err) = self.tokens.clear().await {
            warn!(error = %err, "Failed to clear token store during logout");
        }
        self.observer.on_forced_logout();
    }
}

/// Builder for [`RequestExecutor`]
pub struct RequestExecutorBuilder {
    codec: Option<RequestCodec>,
    transport: Option<Arc<dyn HttpTransport>>,
    reachability: Option<Arc<dyn ReachabilityProbe>>,
    tokens: Option<Arc<dyn TokenStore>>,
    observer: Arc<dyn SessionObserver>,
    retry_policy: RetryPolicy,
    refresh_path: String,
}

impl Default for RequestExecutorBuilder {
    fn default() -> Self {
        Self {
            codec: None,
            transport: None,
            reachability: None,
            tokens: None,
            observer: Arc::new(NoopSessionObserver),
            retry_policy: RetryPolicy::default(),
            refresh_path: paths::AUTH_REFRESH.to_string(),
        }
    }
}

impl RequestExecutorBuilder {
    /// Set the request codec (required)
    pub fn codec(mut self, codec: RequestCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the HTTP transport (required)
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the reachability probe checked before every request (required)
    pub fn reachability(mut self, reachability: Arc<dyn ReachabilityProbe>) -> Self {
        self.reachability = Some(reachability);
        self
    }

    /// Set the token store (required)
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Set the session observer (defaults to a no-op)
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the backoff policy (defaults to `RetryPolicy::default()`)
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Set the refresh endpoint path
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// # Errors
    /// `BullboardError::Config` when a required collaborator is missing.
    pub fn build(self) -> Result<RequestExecutor, BullboardError> {
        let codec = self.codec.ok_or_else(|| missing("codec"))?;
        let transport = self.transport.ok_or_else(|| missing("transport"))?;
        let reachability = self.reachability.ok_or_else(|| missing("reachability probe"))?;
        let tokens = self.tokens.ok_or_else(|| missing("token store"))?;

        let refresher = AuthRefreshCoordinator::with_refresh_path(
            Arc::clone(&transport),
            Arc::clone(&tokens),
            codec.clone(),
            self.refresh_path,
        );

        Ok(RequestExecutor {
            codec,
            transport,
            reachability,
            tokens,
            refresher,
            observer: self.observer,
            retry_policy: self.retry_policy,
        })
    }
}

fn missing(what: &str) -> BullboardError {
    BullboardError::Config(format!("RequestExecutor requires a {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RequestState::Succeeded.is_terminal());
        assert!(RequestState::Failed.is_terminal());
        assert!(!RequestState::RetryWait.is_terminal());
        assert_eq!(RequestState::AwaitingRefresh.as_str(), "awaiting_refresh");
    }

    #[test]
    fn builder_requires_collaborators() {
        let err = RequestExecutor::builder().build().err().unwrap();
        assert!(matches!(err, BullboardError::Config(msg) if msg.contains("codec")));
    }
}
