//! Observability infrastructure
//!
//! Installs the global `tracing` subscriber. Library code only emits events;
//! the host application decides once, at startup, where they go.

pub mod logging;

pub use logging::{build_filter, init_tracing};
