//! Shared test doubles for the pipeline integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bullboard_common::resilience::RetryPolicy;
use bullboard_core::{
    AttemptOutcome, HttpTransport, ReachabilityProbe, RequestCodec, RequestExecutor,
    SessionObserver, TokenStore, TransportFailure, WireRequest,
};
use bullboard_domain::{ApiConfig, Credentials};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::time::Instant;

pub const BASE_URL: &str = "https://api.bullboard.test";

type Handler = Box<dyn Fn(&WireRequest) -> AttemptOutcome + Send + Sync>;

/// Transport double that records every request and answers from a handler
pub struct MockTransport {
    handler: Handler,
    latency: Duration,
    requests: Mutex<Vec<(Instant, WireRequest)>>,
}

impl MockTransport {
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(&WireRequest) -> AttemptOutcome + Send + Sync + 'static,
    {
        Self { handler: Box::new(handler), latency: Duration::ZERO, requests: Mutex::new(Vec::new()) }
    }

    /// Answer requests in order; an exhausted script answers 500.
    pub fn scripted(outcomes: Vec<AttemptOutcome>) -> Self {
        let script = Mutex::new(VecDeque::from(outcomes));
        Self::from_fn(move |_| {
            script
                .lock()
                .pop_front()
                .unwrap_or_else(|| status(500, br#"{"error":"script exhausted"}"#))
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().iter().map(|(_, request)| request.clone()).collect()
    }

    pub fn send_times(&self) -> Vec<Instant> {
        self.requests.lock().iter().map(|(at, _)| *at).collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn refresh_calls(&self) -> usize {
        self.requests.lock().iter().filter(|(_, r)| is_refresh(r)).count()
    }

    pub fn api_calls(&self) -> usize {
        self.call_count() - self.refresh_calls()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: WireRequest) -> AttemptOutcome {
        self.requests.lock().push((Instant::now(), request.clone()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.handler)(&request)
    }
}

pub fn is_refresh(request: &WireRequest) -> bool {
    request.url.path().ends_with("/auth/refresh")
}

pub fn json_ok(value: Value) -> AttemptOutcome {
    AttemptOutcome::from_response(200, serde_json::to_vec(&value).unwrap())
}

pub fn status(code: u16, body: &[u8]) -> AttemptOutcome {
    AttemptOutcome::from_response(code, body.to_vec())
}

pub fn timeout() -> AttemptOutcome {
    TransportFailure::timeout("request timed out after 20s").into()
}

/// In-memory token store counting writes
#[derive(Default)]
pub struct MemoryStore {
    credentials: Mutex<Credentials>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn with_tokens(access: &str, refresh: Option<&str>) -> Self {
        Self {
            credentials: Mutex::new(Credentials::new(access, refresh.map(str::to_string))),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Credentials {
        self.credentials.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn access_token(&self) -> bullboard_domain::Result<Option<String>> {
        Ok(self.credentials.lock().access_token.clone())
    }

    async fn refresh_token(&self) -> bullboard_domain::Result<Option<String>> {
        Ok(self.credentials.lock().refresh_token.clone())
    }

    async fn credentials(&self) -> bullboard_domain::Result<Credentials> {
        Ok(self.credentials.lock().clone())
    }

    async fn save_tokens(&self, access: &str, refresh: Option<&str>) -> bullboard_domain::Result<()> {
        *self.credentials.lock() = Credentials::new(access, refresh.map(str::to_string));
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> bullboard_domain::Result<()> {
        *self.credentials.lock() = Credentials::default();
        Ok(())
    }
}

/// Observer counting notifications
#[derive(Default)]
pub struct CountingObserver {
    logouts: AtomicUsize,
    refreshes: AtomicUsize,
}

impl CountingObserver {
    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl SessionObserver for CountingObserver {
    fn on_forced_logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_tokens_refreshed(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Reachability double with a switchable flag
pub struct Reachability(AtomicBool);

impl Reachability {
    pub fn online() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn offline() -> Self {
        Self(AtomicBool::new(false))
    }
}

#[async_trait]
impl ReachabilityProbe for Reachability {
    async fn is_connected(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn codec() -> RequestCodec {
    let config = ApiConfig {
        base_url: BASE_URL.to_string(),
        app_version: "3.1.0".to_string(),
        ..ApiConfig::default()
    };
    RequestCodec::new(&config).unwrap()
}

/// Everything a pipeline test needs, wired together
pub struct Harness {
    pub executor: RequestExecutor,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub observer: Arc<CountingObserver>,
}

impl Harness {
    pub fn new(transport: MockTransport, store: MemoryStore) -> Self {
        Self::with_reachability(transport, store, Reachability::online())
    }

    pub fn with_reachability(
        transport: MockTransport,
        store: MemoryStore,
        reachability: Reachability,
    ) -> Self {
        let transport = Arc::new(transport);
        let store = Arc::new(store);
        let observer = Arc::new(CountingObserver::default());

        let executor = RequestExecutor::builder()
            .codec(codec())
            .transport(transport.clone())
            .reachability(Arc::new(reachability))
            .token_store(store.clone())
            .observer(observer.clone())
            .retry_policy(RetryPolicy::default())
            .build()
            .unwrap();

        Self { executor, transport, store, observer }
    }
}
