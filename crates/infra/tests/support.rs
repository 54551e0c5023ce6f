#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bullboard_core::SessionObserver;
use bullboard_domain::{Config, Credentials};
use bullboard_infra::{ApiClient, InMemoryTokenStore, ManualReachability};
use wiremock::MockServer;

/// Client pointed at `server` with a fast retry policy.
pub struct TestClient {
    pub client: ApiClient,
    pub store: Arc<InMemoryTokenStore>,
    pub reachability: Arc<ManualReachability>,
    pub observer: Arc<LogoutCounter>,
}

impl TestClient {
    pub fn new(server: &MockServer, credentials: Credentials) -> Self {
        let mut config = Config::default();
        config.api.base_url = server.uri();
        config.retry.unit_ms = 10;

        let store = Arc::new(InMemoryTokenStore::with_credentials(credentials));
        let reachability = Arc::new(ManualReachability::default());
        let observer = Arc::new(LogoutCounter::default());

        let client = ApiClient::builder()
            .config(config)
            .token_store(store.clone())
            .reachability(reachability.clone())
            .observer(observer.clone())
            .build()
            .expect("api client should build");

        Self { client, store, reachability, observer }
    }

    pub fn signed_in(server: &MockServer) -> Self {
        Self::new(server, Credentials::new("abc", Some("refresh-1".into())))
    }
}

#[derive(Default)]
pub struct LogoutCounter {
    logouts: AtomicUsize,
    refreshes: AtomicUsize,
}

impl LogoutCounter {
    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl SessionObserver for LogoutCounter {
    fn on_forced_logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tokens_refreshed(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}
