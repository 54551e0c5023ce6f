//! Token persistence adapters for the [`TokenStore`](bullboard_core::TokenStore) port

pub mod token_store;

pub use token_store::{InMemoryTokenStore, KeychainTokenStore};
