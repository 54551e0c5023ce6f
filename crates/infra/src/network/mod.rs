//! Reachability probes for the [`ReachabilityProbe`](bullboard_core::ReachabilityProbe) port

pub mod reachability;

pub use reachability::{ManualReachability, TcpReachabilityProbe};
