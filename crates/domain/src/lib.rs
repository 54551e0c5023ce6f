//! # Bullboard Domain
//!
//! Data model shared by every Bullboard crate.
//!
//! This crate contains:
//! - The request description (`RequestSpec`) and stored credentials
//! - The classified error surface of the request pipeline (`ApiError`)
//! - Configuration structures and wire constants
//! - Payload types for the auth, quiz, market, social and profile endpoints
//!
//! ## Architecture
//! - No dependencies on other Bullboard crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
