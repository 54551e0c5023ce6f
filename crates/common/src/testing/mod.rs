//! Testing utilities
//!
//! - **[`mocks`]**: in-memory doubles for platform services

pub mod mocks;

pub use mocks::MockKeychainProvider;
