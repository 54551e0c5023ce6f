//! Mock implementations of common traits

#![allow(clippy::missing_errors_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

#[cfg(feature = "platform")]
use crate::security::{KeychainError, SecretStore};

/// In-memory stand-in for the platform keychain
///
/// Clones share storage, so a test can keep a handle and inspect what the
/// code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct MockKeychainProvider {
    storage: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    service_name: String,
}

impl MockKeychainProvider {
    /// Empty mock store for `service_name`
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), ..Self::default() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Make subsequent `set_secret` calls fail with `AccessFailed`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw view of the stored value, bypassing the trait
    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.lock().get(key).cloned()
    }

    /// Number of stored secrets
    pub fn len(&self) -> usize {
        self.storage.lock().len()
    }

    /// Whether no secret is stored
    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }
}

#[cfg(feature = "platform")]
impl SecretStore for MockKeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("mock write refused for {key}")));
        }
        self.storage.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.storage.lock().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.storage.lock().remove(key);
        Ok(())
    }
}
