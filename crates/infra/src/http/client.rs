use std::time::Duration;

use async_trait::async_trait;
use bullboard_core::{AttemptOutcome, HttpTransport, TransportFailure, WireRequest};
use bullboard_domain::constants::DEFAULT_RESOURCE_TIMEOUT_SECS;
use bullboard_domain::{BullboardError, HttpMethod};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// reqwest-backed [`HttpTransport`].
///
/// Performs exactly one network exchange per `send`; retries and token
/// refresh belong to the executor.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// `BullboardError::Config` if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, BullboardError> {
        Self::builder().build()
    }

    fn to_reqwest(&self, request: WireRequest) -> Result<reqwest::Request, TransportFailure> {
        let mut builder = self
            .client
            .request(to_method(request.method), request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportFailure::other(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportFailure::other(format!("invalid value for header '{name}': {e}")))?;
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        builder.build().map_err(|err| to_failure(&err))
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    #[instrument(skip_all, fields(method = %request.method, url = %request.url.path()))]
    async fn send(&self, request: WireRequest) -> AttemptOutcome {
        let request = match self.to_reqwest(request) {
            Ok(request) => request,
            Err(failure) => return AttemptOutcome::TransportFailure(failure),
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "HTTP request failed");
                return AttemptOutcome::TransportFailure(to_failure(&err));
            }
        };

        let status = response.status().as_u16();
        debug!(status, "received HTTP response");

        match response.bytes().await {
            Ok(body) => AttemptOutcome::from_response(status, body.to_vec()),
            Err(err) => {
                debug!(status, error = %err, "failed to read response body");
                AttemptOutcome::TransportFailure(to_failure(&err))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    accept_invalid_certs: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_RESOURCE_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientBuilder {
    /// Upper bound for a whole transfer. Each request also carries its own
    /// per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Test-only helper to allow insecure TLS (e.g., self-signed certs).
    #[cfg(test)]
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    /// # Errors
    /// `BullboardError::Config` if reqwest rejects the configuration.
    pub fn build(self) -> Result<HttpClient, BullboardError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            BullboardError::from(infra)
        })?;

        Ok(HttpClient { client })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_failure(err: &reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        return TransportFailure::timeout(err.to_string());
    }
    if err.is_connect() {
        return TransportFailure::connect(err.to_string());
    }
    TransportFailure::other(err.to_string())
}
