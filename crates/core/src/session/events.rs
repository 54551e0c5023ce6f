//! Session notifications for UI consumers
//!
//! [`SessionEvents`] fans pipeline notifications out over a broadcast
//! channel; [`LogoutCallback`] adapts a plain closure. Both implement
//! [`SessionObserver`] and can be handed to the executor builder.

use std::fmt;

use tokio::sync::broadcast;
use tracing::debug;

use super::ports::SessionObserver;

const DEFAULT_CAPACITY: usize = 16;

/// Notification published by [`SessionEvents`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session ended after an unrecoverable authorization failure
    ForcedLogout,
    /// A refresh stored a new access token
    TokensRefreshed,
}

/// Broadcast channel of [`SessionEvent`]s
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionEvents {
    /// Channel buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    fn publish(&self, event: SessionEvent) {
        // Err only means nobody is listening right now.
        if self.sender.send(event).is_err() {
            debug!(?event, "Session event dropped, no subscribers");
        }
    }
}

impl SessionObserver for SessionEvents {
    fn on_forced_logout(&self) {
        self.publish(SessionEvent::ForcedLogout);
    }

    fn on_tokens_refreshed(&self) {
        self.publish(SessionEvent::TokensRefreshed);
    }
}

/// Observer that runs a closure on forced logout
pub struct LogoutCallback<F>
where
    F: Fn() + Send + Sync,
{
    callback: F,
}

impl<F> LogoutCallback<F>
where
    F: Fn() + Send + Sync,
{
    /// Run `callback` on every forced logout
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> fmt::Debug for LogoutCallback<F>
where
    F: Fn() + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoutCallback").finish_non_exhaustive()
    }
}

impl<F> SessionObserver for LogoutCallback<F>
where
    F: Fn() + Send + Sync,
{
    fn on_forced_logout(&self) {
        (self.callback)();
    }
}
