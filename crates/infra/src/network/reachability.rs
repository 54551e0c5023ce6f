use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bullboard_core::ReachabilityProbe;
use bullboard_domain::{BullboardError, Result};
use tokio::net::TcpStream;
use tracing::debug;
use url::Url;

/// Default time allowed for the probe connection
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Reports connectivity by opening a TCP connection to the API host.
///
/// The connection is dropped immediately; no bytes are sent.
#[derive(Debug, Clone)]
pub struct TcpReachabilityProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpReachabilityProbe {
    /// Probe `host:port` with the default timeout
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, timeout: DEFAULT_PROBE_TIMEOUT }
    }

    /// Probe the host and port of `base_url`, using the scheme's default port
    /// when none is given.
    ///
    /// # Errors
    /// `BullboardError::Config` if the URL does not parse or has no host.
    pub fn for_base_url(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| BullboardError::Config(format!("Invalid base URL '{base_url}': {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| BullboardError::Config(format!("Base URL '{base_url}' has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| BullboardError::Config(format!("Base URL '{base_url}' has no port")))?;
        Ok(Self::new(host, port))
    }

    /// Override the connect timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host and port being probed
    pub fn target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachabilityProbe {
    async fn is_connected(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(err)) => {
                debug!(host = %self.host, port = self.port, error = %err, "Reachability probe failed");
                false
            }
            Err(_) => {
                debug!(host = %self.host, port = self.port, "Reachability probe timed out");
                false
            }
        }
    }
}

/// Connectivity flag driven by the host application, e.g. from OS network
/// change notifications. Starts online.
#[derive(Debug)]
pub struct ManualReachability {
    online: AtomicBool,
}

impl Default for ManualReachability {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ManualReachability {
    /// Flag starting at `online`
    pub fn new(online: bool) -> Self {
        Self { online: AtomicBool::new(online) }
    }

    /// Update the flag, typically from OS network notifications
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReachabilityProbe for ManualReachability {
    async fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn base_url_default_ports() {
        let https = TcpReachabilityProbe::for_base_url("https://api.bullboard.app").unwrap();
        assert_eq!(https.target(), ("api.bullboard.app", 443));

        let local = TcpReachabilityProbe::for_base_url("http://127.0.0.1:8080/api").unwrap();
        assert_eq!(local.target(), ("127.0.0.1", 8080));

        assert!(TcpReachabilityProbe::for_base_url("not a url").is_err());
    }

    #[tokio::test]
    async fn listening_host_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(TcpReachabilityProbe::new("127.0.0.1", port).is_connected().await);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TcpReachabilityProbe::new("127.0.0.1", port).with_timeout(Duration::from_millis(200));
        assert!(!probe.is_connected().await);
    }

    #[tokio::test]
    async fn manual_flag_toggles() {
        let reachability = ManualReachability::default();
        assert!(reachability.is_connected().await);

        reachability.set_online(false);
        assert!(!reachability.is_connected().await);
    }
}
