//! API client wiring
//!
//! Builds the [`RequestExecutor`] from a [`Config`] and explicitly supplied
//! collaborators. Nothing here is global: two clients built from different
//! configurations never share state.

use std::sync::Arc;
use std::time::Duration;

use bullboard_common::resilience::RetryPolicy;
use bullboard_core::{
    HttpTransport, ReachabilityProbe, RequestCodec, RequestExecutor, SessionObserver, TokenStore,
};
use bullboard_domain::{
    ApiEnvelope, ApiError, BullboardError, Config, MessageResponse, RequestSpec, RetryConfig,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::auth::AuthApi;
use super::market::MarketApi;
use super::profile::ProfileApi;
use super::quiz::QuizApi;
use super::social::SocialApi;
use crate::auth::KeychainTokenStore;
use crate::http::HttpClient;
use crate::network::TcpReachabilityProbe;

/// Translate retry settings into a backoff policy.
///
/// # Errors
/// `BullboardError::Config` if the base or unit is rejected by the policy.
pub fn retry_policy_from_config(config: &RetryConfig) -> Result<RetryPolicy, BullboardError> {
    let builder = RetryPolicy::builder()
        .unit(Duration::from_millis(config.unit_ms))
        .base(config.base);

    let builder = match config.max_delay_secs {
        Some(secs) => builder.max_delay(Duration::from_secs(secs)),
        None => builder.uncapped(),
    };

    builder.build().map_err(|e| BullboardError::Config(format!("Invalid retry settings: {e}")))
}

/// Entry point to the Bullboard API
///
/// Cheap to clone; clones share the executor, token store and refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    executor: Arc<RequestExecutor>,
    default_attempts: u32,
}

impl ApiClient {
    /// Start wiring a client
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Production wiring: reqwest transport, keychain token store (loaded
    /// from the keychain before returning) and a TCP reachability probe.
    ///
    /// # Errors
    /// `BullboardError::Config` for invalid configuration, keychain errors
    /// from loading a stored session.
    pub async fn connect(config: Config) -> Result<Self, BullboardError> {
        let tokens = KeychainTokenStore::from_config(&config.auth);
        tokens.initialize().await?;

        Self::builder().config(config).token_store(Arc::new(tokens)).build()
    }

    /// Underlying request executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Store holding the session tokens
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        self.executor.token_store()
    }

    /// Registration, verification and logout
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Onboarding quiz
    pub fn quiz(&self) -> QuizApi {
        QuizApi::new(self.clone())
    }

    /// Market data
    pub fn market(&self) -> MarketApi {
        MarketApi::new(self.clone())
    }

    /// Comments, votes, follows and forum
    pub fn social(&self) -> SocialApi {
        SocialApi::new(self.clone())
    }

    /// The signed-in user's profile
    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.clone())
    }

    /// Run `spec` as given and decode the raw body into `T`.
    ///
    /// # Errors
    /// The classified pipeline failure.
    pub async fn execute<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T, ApiError> {
        self.executor.execute(spec).await
    }

    /// Give `spec` the configured attempt budget. Used by the endpoint
    /// helpers; specs passed straight to [`Self::fetch`] keep their own.
    pub(crate) fn endpoint(&self, spec: RequestSpec) -> RequestSpec {
        spec.with_max_attempts(self.default_attempts)
    }

    /// Run `spec` and unwrap the `{success, data}` envelope.
    ///
    /// The spec's `max_attempts` is used as given.
    ///
    /// # Errors
    /// The classified pipeline failure, or `DecodingError` when the envelope
    /// has no `data`.
    #[instrument(skip(self, spec), fields(path = %spec.path()))]
    pub async fn fetch<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ApiError> {
        let envelope: ApiEnvelope<T> = self.executor.execute(&spec).await?;
        envelope.into_data()
    }

    /// Run `spec` for an acknowledgement without payload.
    ///
    /// # Errors
    /// The classified pipeline failure.
    pub async fn acknowledge(&self, spec: RequestSpec) -> Result<MessageResponse, ApiError> {
        let response: Option<MessageResponse> = self.executor.execute(&spec).await?;
        Ok(response.unwrap_or_default())
    }

    /// Authenticated GET returning the enveloped payload.
    ///
    /// # Errors
    /// See [`Self::fetch`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(self.endpoint(RequestSpec::get(path))).await
    }

    /// Authenticated POST with a JSON body returning the enveloped payload.
    ///
    /// # Errors
    /// `DecodingError` if `body` cannot be serialized; otherwise see
    /// [`Self::fetch`].
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(self.endpoint(RequestSpec::post(path).with_body(to_json(body)?))).await
    }

    /// Authenticated PUT with a JSON body returning the enveloped payload.
    ///
    /// # Errors
    /// See [`Self::post`].
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(self.endpoint(RequestSpec::put(path).with_body(to_json(body)?))).await
    }

    /// Authenticated DELETE returning the enveloped payload.
    ///
    /// # Errors
    /// See [`Self::fetch`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(self.endpoint(RequestSpec::delete(path))).await
    }
}

pub(crate) fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::DecodingError(format!("request body: {e}")))
}

/// Builder for [`ApiClient`]
///
/// Only the token store is required. Unset collaborators default to the
/// production adapters derived from the configuration.
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<Config>,
    transport: Option<Arc<dyn HttpTransport>>,
    reachability: Option<Arc<dyn ReachabilityProbe>>,
    tokens: Option<Arc<dyn TokenStore>>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl ApiClientBuilder {
    /// Set the configuration (defaults to `Config::default()`)
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the reqwest transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the TCP reachability probe
    pub fn reachability(mut self, reachability: Arc<dyn ReachabilityProbe>) -> Self {
        self.reachability = Some(reachability);
        self
    }

    /// Set the token store (required)
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Receives forced-logout and refresh notifications
    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    /// `BullboardError::Config` if the configuration is invalid or the token
    /// store is missing.
    pub fn build(self) -> Result<ApiClient, BullboardError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let tokens = self
            .tokens
            .ok_or_else(|| BullboardError::Config("Token store not set".to_string()))?;

        let codec = RequestCodec::new(&config.api)
            .map_err(|e| BullboardError::Config(format!("Invalid API settings: {e}")))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpClient::builder()
                    .timeout(config.api.resource_timeout())
                    .user_agent(format!("Bullboard/{} ({})", config.api.app_version, config.api.platform))
                    .build()?,
            ),
        };

        let reachability = match self.reachability {
            Some(reachability) => reachability,
            None => Arc::new(TcpReachabilityProbe::for_base_url(&config.api.base_url)?),
        };

        let mut executor = RequestExecutor::builder()
            .codec(codec)
            .transport(transport)
            .reachability(reachability)
            .token_store(tokens)
            .retry_policy(retry_policy_from_config(&config.retry)?)
            .refresh_path(config.auth.refresh_path.clone());

        if let Some(observer) = self.observer {
            executor = executor.observer(observer);
        }

        debug!(base_url = %config.api.base_url, "API client configured");

        Ok(ApiClient {
            executor: Arc::new(executor.build()?),
            default_attempts: config.retry.max_attempts,
        })
    }
}
