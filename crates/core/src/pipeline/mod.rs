//! Authenticated request pipeline
//!
//! - [`codec`]: wire encoding, response decoding, error classification
//! - [`executor`]: retries with backoff and the one-shot refresh-and-replay
//! - [`outcome`]: result of a single round trip
//! - [`ports`]: transport and reachability interfaces

pub mod codec;
pub mod executor;
pub mod outcome;
pub mod ports;

pub use codec::{is_live_market_path, CachePolicy, RequestCodec, WireRequest};
pub use executor::{RequestExecutor, RequestExecutorBuilder, RequestState};
pub use outcome::{AttemptOutcome, TransportFailure, TransportFailureKind};
pub use ports::{HttpTransport, ReachabilityProbe};
