//! Port interfaces for session state
//!
//! These traits define the boundary between the request pipeline and the
//! code that persists tokens or reacts to session changes.

use async_trait::async_trait;
use bullboard_domain::{Credentials, Result};

/// Secure persistence for the access/refresh token pair
///
/// Implementations must publish both tokens as one unit: a reader never
/// observes the access token of one save together with the refresh token of
/// another.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current access token, if signed in
    async fn access_token(&self) -> Result<Option<String>>;

    /// Current refresh token, if one was issued
    async fn refresh_token(&self) -> Result<Option<String>>;

    /// Snapshot of both tokens
    async fn credentials(&self) -> Result<Credentials>;

    /// Replace the stored tokens. `refresh = None` removes the refresh token.
    async fn save_tokens(&self, access: &str, refresh: Option<&str>) -> Result<()>;

    /// Forget both tokens
    async fn clear(&self) -> Result<()>;
}

/// Receives session notifications from the pipeline
///
/// The UI layer implements this (or subscribes to `SessionEvents`) to drop
/// local session state and route to the sign-in screen.
pub trait SessionObserver: Send + Sync {
    /// An authorization failure could not be recovered by a token refresh.
    /// Called once per failed request, after the token store was cleared.
    fn on_forced_logout(&self);

    /// A refresh stored a new access token.
    fn on_tokens_refreshed(&self) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionObserver;

impl SessionObserver for NoopSessionObserver {
    fn on_forced_logout(&self) {}
}
