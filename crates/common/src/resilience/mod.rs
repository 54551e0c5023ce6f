//! Resilience patterns for transient failures
//!
//! - **Backoff**: exponential delay between retryable attempts, with an
//!   optional per-delay ceiling

pub mod backoff;

pub use backoff::{BackoffError, RetryPolicy, RetryPolicyBuilder};
