//! Result of one network round trip

use std::fmt;

/// Why no HTTP response was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// The per-attempt timeout elapsed
    Timeout,
    /// The connection could not be established
    Connect,
    /// Anything else below HTTP (TLS, body read, malformed response)
    Other,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "transport",
        })
    }
}

/// Transport-level failure; always eligible for retry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Failure category
    pub kind: TransportFailureKind,
    /// Human-readable detail from the transport
    pub message: String,
}

impl TransportFailure {
    /// Failure of the given kind
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Per-attempt timeout elapsed
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Timeout, message)
    }

    /// Connection could not be established
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Connect, message)
    }

    /// Any other transport failure
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportFailureKind::Other, message)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Outcome of a single send. Produced by the transport, consumed by the
/// executor immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Status in `[200, 300)`
    Success { status: u16, body: Vec<u8> },
    /// Any other HTTP status
    HttpFailure { status: u16, body: Vec<u8> },
    /// No HTTP response
    TransportFailure(TransportFailure),
}

impl AttemptOutcome {
    /// Sort a received response into `Success` or `HttpFailure`.
    pub fn from_response(status: u16, body: Vec<u8>) -> Self {
        if (200..300).contains(&status) {
            Self::Success { status, body }
        } else {
            Self::HttpFailure { status, body }
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } | Self::HttpFailure { status, .. } => Some(*status),
            Self::TransportFailure(_) => None,
        }
    }
}

impl From<TransportFailure> for AttemptOutcome {
    fn from(failure: TransportFailure) -> Self {
        Self::TransportFailure(failure)
    }
}
