//! Session state: token storage port, refresh coordination, notifications

pub mod events;
pub mod ports;
pub mod refresh;

pub use events::{LogoutCallback, SessionEvent, SessionEvents};
pub use ports::{NoopSessionObserver, SessionObserver, TokenStore};
pub use refresh::{AuthRefreshCoordinator, RefreshError, RefreshOutcome};
