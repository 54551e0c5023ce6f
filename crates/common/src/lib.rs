//! Reusable building blocks shared across Bullboard crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: resilience primitives (backoff policy)
//! - `platform`: platform integrations (keychain secret storage)
//! - `test-utils`: in-memory doubles for platform services

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod resilience;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "platform")))]
pub mod testing;

#[cfg(feature = "foundation")]
pub use resilience::{BackoffError, RetryPolicy};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider, SecretStore};
