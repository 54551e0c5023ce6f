//! # Bullboard Infrastructure
//!
//! Infrastructure implementations of core pipeline ports.
//!
//! This crate contains:
//! - The reqwest HTTP transport
//! - Keychain and in-memory token stores
//! - Reachability probes
//! - Configuration loading and logging setup
//! - The typed endpoint client (`ApiClient`)
//!
//! ## Architecture
//! - Implements traits defined in `bullboard-core`
//! - Depends on `bullboard-common`, `bullboard-domain` and `bullboard-core`
//! - Contains all "impure" code (network, keychain, filesystem)

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod network;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder};
pub use auth::{InMemoryTokenStore, KeychainTokenStore};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use network::{ManualReachability, TcpReachabilityProbe};
pub use observability::init_tracing;
