//! Gateway error types

use thiserror::Error;

/// Failure talking to one of the backend endpoints
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Timeout, message)
    }

    /// Non-2xx response; `body` is kept verbatim as the message
    pub fn status(code: u16, body: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Status(code), body)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Malformed, message)
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Client, message)
    }

    /// Server-provided detail text, present only for non-2xx responses
    pub fn server_detail(&self) -> Option<&str> {
        match self.kind {
            GatewayErrorKind::Status(_) => Some(self.message.trim()),
            _ => None,
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// Connection refused, reset, DNS failure
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Server answered with a non-2xx status
    Status(u16),
    /// Body was not the expected JSON shape
    Malformed,
    /// The HTTP client could not be constructed
    Client,
}
