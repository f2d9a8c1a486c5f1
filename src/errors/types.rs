//! Request error definitions.

use thiserror::Error;

/// Shape of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The remote host refused the connection.
    ConnectionRefused,
    /// Host name resolution failed.
    Dns,
    /// Any other connectivity failure (reset, unreachable, TLS, ...).
    Network,
    /// The transport itself gave up waiting.
    TimedOut,
    /// The transport rejected the request before sending it.
    Request,
}

/// Errors produced while executing a logical request.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// The attempt's cancellation token fired (timeout, abort, supersede, teardown).
    #[error("request cancelled: {reason}")]
    Cancelled { reason: String },

    /// The transport call failed without being cancelled.
    #[error("{message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The owning session was already torn down; no call was made.
    #[error("caller torn down")]
    TornDown,

    /// The request could not be constructed (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl RequestError {
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled {
            reason: reason.into(),
        }
    }

    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    /// True for errors caused by a cancellation signal.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True for errors that must never reach the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::TornDown)
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        let detail = error_chain(&err).to_ascii_lowercase();

        let kind = if err.is_timeout() {
            TransportErrorKind::TimedOut
        } else if err.is_builder() {
            return Self::InvalidRequest(message);
        } else if err.is_decode() {
            return Self::Decode(message);
        } else if detail.contains("dns error") || detail.contains("failed to lookup address") {
            TransportErrorKind::Dns
        } else if detail.contains("connection refused") {
            TransportErrorKind::ConnectionRefused
        } else if err.is_connect() || err.is_request() || err.is_body() {
            TransportErrorKind::Network
        } else {
            TransportErrorKind::Request
        };

        let message = if detail.is_empty() {
            message
        } else {
            format!("{message}: {detail}")
        };
        Self::Transport { kind, message }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// Result type for request operations.
pub type RequestResult<T> = Result<T, RequestError>;

// reqwest hides the interesting part (refused, dns) in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
