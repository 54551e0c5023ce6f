//! Registration and sign-in
//!
//! Register, verify and resend are public endpoints. A successful verify
//! stores the issued token pair, after which authenticated endpoints work.

use bullboard_domain::constants::paths;
use bullboard_domain::{
    ApiError, MessageResponse, RegisterRequest, RegisterResponse, RequestSpec, ResendCodeRequest,
    TokenPair, VerifyRequest,
};
use tracing::{info, instrument, warn};

use super::client::{to_json, ApiClient};

/// Auth endpoints
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Auth endpoints over `client`
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Start registration; the server emails a verification code.
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip(self, email))]
    pub async fn register(
        &self,
        email: &str,
        username: &str,
    ) -> Result<RegisterResponse, ApiError> {
        let body = RegisterRequest { email: email.to_string(), username: username.to_string() };
        let spec = self
            .client
            .endpoint(RequestSpec::post(paths::AUTH_REGISTER).public().with_body(to_json(&body)?));
        self.client.fetch(spec).await
    }

    /// Exchange the emailed code for a session and store its tokens.
    ///
    /// # Errors
    /// Returns error if API request fails, or `Unauthorized` if the issued
    /// tokens could not be stored
    #[instrument(skip_all)]
    pub async fn verify(&self, email: &str, code: &str) -> Result<TokenPair, ApiError> {
        let body = VerifyRequest { email: email.to_string(), code: code.to_string() };
        let spec = self
            .client
            .endpoint(RequestSpec::post(paths::AUTH_VERIFY).public().with_body(to_json(&body)?));
        let pair: TokenPair = self.client.fetch(spec).await?;

        if let Err(err) = self
            .client
            .token_store()
            .save_tokens(&pair.access_token, pair.refresh_token.as_deref())
            .await
        {
            warn!(error = %err, "Failed to store tokens after verification");
            return Err(ApiError::Unauthorized);
        }

        info!("Session established");
        Ok(pair)
    }

    /// Ask the server to send a new verification code.
    ///
    /// # Errors
    /// Returns error if API request fails
    #[instrument(skip_all)]
    pub async fn resend_code(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = ResendCodeRequest { email: email.to_string() };
        let spec = self
            .client
            .endpoint(RequestSpec::post(paths::AUTH_RESEND).public().with_body(to_json(&body)?));
        self.client.acknowledge(spec).await
    }

    /// Drop the local session. No request is sent.
    ///
    /// # Errors
    /// Returns error if the token store cannot be cleared
    pub async fn logout(&self) -> bullboard_domain::Result<()> {
        self.client.token_store().clear().await?;
        info!("Signed out");
        Ok(())
    }
}
