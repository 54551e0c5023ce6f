//! Port interfaces for the request pipeline
//!
//! Implemented in `bullboard-infra` (reqwest transport, TCP / manual
//! reachability) and by test doubles.

use async_trait::async_trait;

use super::codec::WireRequest;
use super::outcome::AttemptOutcome;

/// Sends one encoded request over the network
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a single round trip. Never retries; timeouts and connection
    /// errors come back as `AttemptOutcome::TransportFailure`.
    async fn send(&self, request: WireRequest) -> AttemptOutcome;
}

/// Connectivity check run before every request
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}
