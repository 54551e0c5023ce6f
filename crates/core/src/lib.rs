//! # Bullboard Core
//!
//! Request pipeline logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The request codec, executor and refresh coordinator
//! - Port/adapter interfaces (traits) for transport, reachability and token
//!   storage
//! - Session notifications for UI consumers
//!
//! ## Architecture Principles
//! - Depends only on `bullboard-common` and `bullboard-domain`
//! - No HTTP client or platform code
//! - All external dependencies via traits

pub mod pipeline;
pub mod session;

pub use pipeline::{
    AttemptOutcome, CachePolicy, HttpTransport, ReachabilityProbe, RequestCodec, RequestExecutor,
    RequestExecutorBuilder, TransportFailure, TransportFailureKind, WireRequest,
};
pub use session::{
    AuthRefreshCoordinator, LogoutCallback, NoopSessionObserver, RefreshError, RefreshOutcome,
    SessionEvent, SessionEvents, SessionObserver, TokenStore,
};
