//! Typed client for the Bullboard REST API
//!
//! [`ApiClient`] wires the request pipeline from configuration and hands out
//! one view per endpoint group. Every endpoint method builds exactly one
//! `RequestSpec` and runs it through the shared executor.

pub mod auth;
pub mod client;
pub mod market;
pub mod profile;
pub mod quiz;
pub mod social;

pub use auth::AuthApi;
pub use client::{retry_policy_from_config, ApiClient, ApiClientBuilder};
pub use market::MarketApi;
pub use profile::ProfileApi;
pub use quiz::QuizApi;
pub use social::SocialApi;
