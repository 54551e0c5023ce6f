//! Token stores
//!
//! - [`InMemoryTokenStore`]: process-local, for tests and ephemeral sessions
//! - [`KeychainTokenStore`]: persists the pair in the platform keychain and
//!   serves reads from an in-memory mirror
//!
//! Both replace the access and refresh token together, so readers never see
//! a new access token paired with a stale refresh token.

use std::sync::Arc;

use async_trait::async_trait;
use bullboard_common::security::{KeychainError, KeychainProvider, SecretStore};
use bullboard_core::TokenStore;
use bullboard_domain::{AuthConfig, BullboardError, Credentials, Result};
use parking_lot::RwLock as SyncRwLock;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::errors::InfraError;

/// Process-local token store
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    credentials: SyncRwLock<Credentials>,
}

impl InMemoryTokenStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `credentials`
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self { credentials: SyncRwLock::new(credentials) }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.credentials.read().access_token.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.credentials.read().refresh_token.clone())
    }

    async fn credentials(&self) -> Result<Credentials> {
        Ok(self.credentials.read().clone())
    }

    async fn save_tokens(&self, access: &str, refresh: Option<&str>) -> Result<()> {
        *self.credentials.write() = Credentials::new(access, refresh.map(str::to_string));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.credentials.write() = Credentials::default();
        Ok(())
    }
}

/// Keychain-backed token store
///
/// The pair is stored as one JSON blob under `account`, so a write replaces
/// both tokens at once. Call [`initialize`](Self::initialize) on startup to
/// load a previously stored session.
pub struct KeychainTokenStore<S: SecretStore + 'static = KeychainProvider> {
    keychain: Arc<S>,
    account: String,
    current: RwLock<Credentials>,
}

impl KeychainTokenStore<KeychainProvider> {
    /// Store backed by the platform keychain, named by `config`.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            Arc::new(KeychainProvider::new(config.keychain_service.clone())),
            config.keychain_account.clone(),
        )
    }
}

impl<S: SecretStore + 'static> KeychainTokenStore<S> {
    /// Store filing tokens under `account` in `keychain`
    pub fn new(keychain: Arc<S>, account: impl Into<String>) -> Self {
        Self { keychain, account: account.into(), current: RwLock::new(Credentials::default()) }
    }

    /// Keychain account the tokens are stored under
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Load stored tokens into memory.
    ///
    /// Returns `true` if a session was found.
    ///
    /// # Errors
    /// Returns error if keychain access fails or the stored blob is corrupt
    /// (not if tokens don't exist)
    pub async fn initialize(&self) -> Result<bool> {
        let mut current = self.current.write().await;

        match self.read_blob().await {
            Ok(blob) => {
                let credentials: Credentials = serde_json::from_str(&blob).map_err(|e| {
                    BullboardError::Security(format!("stored credentials are corrupt: {e}"))
                })?;
                let found = !credentials.is_empty();
                *current = credentials;
                info!(found, "Token store initialized from keychain");
                Ok(found)
            }
            Err(KeychainError::NotFound) => {
                debug!("No existing tokens found in keychain");
                *current = Credentials::default();
                Ok(false)
            }
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    async fn read_blob(&self) -> std::result::Result<String, KeychainError> {
        let keychain = Arc::clone(&self.keychain);
        let account = self.account.clone();
        tokio::task::spawn_blocking(move || keychain.get_secret(&account))
            .await
            .map_err(|e| KeychainError::AccessFailed(format!("keychain task failed: {e}")))?
    }

    async fn write_blob(&self, blob: String) -> Result<()> {
        let keychain = Arc::clone(&self.keychain);
        let account = self.account.clone();
        tokio::task::spawn_blocking(move || keychain.set_secret(&account, &blob))
            .await
            .map_err(|e| BullboardError::Internal(format!("keychain task failed: {e}")))?
            .map_err(|e| InfraError::from(e).into())
    }

    async fn delete_blob(&self) -> Result<()> {
        let keychain = Arc::clone(&self.keychain);
        let account = self.account.clone();
        tokio::task::spawn_blocking(move || keychain.delete_secret(&account))
            .await
            .map_err(|e| BullboardError::Internal(format!("keychain task failed: {e}")))?
            .map_err(|e| InfraError::from(e).into())
    }
}

#[async_trait]
impl<S: SecretStore + 'static> TokenStore for KeychainTokenStore<S> {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.current.read().await.access_token.clone())
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.current.read().await.refresh_token.clone())
    }

    async fn credentials(&self) -> Result<Credentials> {
        Ok(self.current.read().await.clone())
    }

    async fn save_tokens(&self, access: &str, refresh: Option<&str>) -> Result<()> {
        let next = Credentials::new(access, refresh.map(str::to_string));
        let blob = serde_json::to_string(&next)
            .map_err(|e| BullboardError::Internal(format!("failed to encode credentials: {e}")))?;

        // Mirror is updated only after the keychain accepted the write.
        let mut current = self.current.write().await;
        self.write_blob(blob).await?;
        *current = next;

        debug!(account = %self.account, "Tokens persisted to keychain");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut current = self.current.write().await;
        *current = Credentials::default();

        if let Err(err) = self.delete_blob().await {
            warn!(account = %self.account, error = %err, "Failed to delete tokens from keychain");
            return Err(err);
        }
        info!(account = %self.account, "Tokens cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bullboard_common::testing::MockKeychainProvider;

    use super::*;

    fn keychain_store() -> (KeychainTokenStore<MockKeychainProvider>, Arc<MockKeychainProvider>) {
        let keychain = Arc::new(MockKeychainProvider::new("Bullboard.test"));
        (KeychainTokenStore::new(Arc::clone(&keychain), "main"), keychain)
    }

    #[tokio::test]
    async fn in_memory_store_replaces_pair() {
        let store = InMemoryTokenStore::with_credentials(Credentials::new("a1", Some("r1".into())));

        store.save_tokens("a2", None).await.unwrap();
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().await.unwrap(), None);

        store.clear().await.unwrap();
        assert!(store.credentials().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keychain_store_persists_as_one_blob() {
        let (store, keychain) = keychain_store();

        store.save_tokens("access", Some("refresh")).await.unwrap();

        let blob = keychain.stored("main").expect("blob stored");
        let persisted: Credentials = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, Credentials::new("access", Some("refresh".into())));
        assert_eq!(store.access_token().await.unwrap().as_deref(), Some("access"));
    }

    #[tokio::test]
    async fn initialize_loads_existing_session() {
        let (store, keychain) = keychain_store();
        keychain
            .set_secret("main", r#"{"access_token":"a","refresh_token":"r"}"#)
            .unwrap();

        assert!(store.initialize().await.unwrap());
        assert_eq!(store.refresh_token().await.unwrap().as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn initialize_without_session_is_not_an_error() {
        let (store, _) = keychain_store();
        assert!(!store.initialize().await.unwrap());
        assert_eq!(store.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_blob_is_reported() {
        let (store, keychain) = keychain_store();
        keychain.set_secret("main", "not json").unwrap();

        assert!(matches!(store.initialize().await, Err(BullboardError::Security(_))));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_tokens() {
        let (store, keychain) = keychain_store();
        store.save_tokens("a1", Some("r1")).await.unwrap();

        keychain.fail_writes(true);
        assert!(store.save_tokens("a2", Some("r2")).await.is_err());

        assert_eq!(
            store.credentials().await.unwrap(),
            Credentials::new("a1", Some("r1".into()))
        );
    }

    #[tokio::test]
    async fn clear_removes_keychain_entry() {
        let (store, keychain) = keychain_store();
        store.save_tokens("a", Some("r")).await.unwrap();

        store.clear().await.unwrap();

        assert!(keychain.stored("main").is_none());
        assert!(store.credentials().await.unwrap().is_empty());
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }
}
