//! Error classification into user-facing messages.
//!
//! # Responsibilities
//! - Decide whether a final rejection is shown at all
//! - Map connectivity and timeout failures to fixed friendly messages
//! - Fall back to the error's own message
//!
//! # Design Decisions
//! - Liveness is checked before the error is inspected
//! - Pure function of its inputs; never panics

use crate::cancellation::Liveness;
use crate::errors::types::{RequestError, TransportErrorKind};

/// Shown when the server cannot be reached at all.
pub const CANNOT_REACH_SERVER: &str =
    "Unable to connect to the server. Please check your connection and try again.";

/// Shown when a request failed because it took too long.
pub const REQUEST_TIMED_OUT: &str =
    "The request timed out. The server may be slow, please try again.";

const UNREACHABLE_SIGNATURES: &[&str] = &[
    "connection refused",
    "dns error",
    "failed to lookup address",
    "failed to fetch",
    "network error",
    "networkerror",
    "network is unreachable",
];

const TIMEOUT_SIGNATURES: &[&str] = &["timed out", "timeout"];

/// Turn a final request error into text for the user, or `None` to stay silent.
pub fn classify(error: &RequestError, liveness: &Liveness) -> Option<String> {
    if !liveness.is_alive() {
        return None;
    }

    if error.is_silent() {
        return None;
    }

    if is_unreachable(error) {
        return Some(CANNOT_REACH_SERVER.to_string());
    }

    if mentions_timeout(error) {
        return Some(REQUEST_TIMED_OUT.to_string());
    }

    Some(error.to_string())
}

fn is_unreachable(error: &RequestError) -> bool {
    if let RequestError::Transport { kind, .. } = error {
        if matches!(
            kind,
            TransportErrorKind::ConnectionRefused
                | TransportErrorKind::Dns
                | TransportErrorKind::Network
        ) {
            return true;
        }
    }
    let text = error.to_string().to_ascii_lowercase();
    UNREACHABLE_SIGNATURES.iter().any(|sig| text.contains(sig))
}

fn mentions_timeout(error: &RequestError) -> bool {
    if let RequestError::Transport {
        kind: TransportErrorKind::TimedOut,
        ..
    } = error
    {
        return true;
    }
    let text = error.to_string().to_ascii_lowercase();
    TIMEOUT_SIGNATURES.iter().any(|sig| text.contains(sig))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_error_kind() -> Vec<RequestError> {
        vec![
            RequestError::cancelled("attempt 0 timed out"),
            RequestError::TornDown,
            RequestError::transport(TransportErrorKind::ConnectionRefused, "refused"),
            RequestError::transport(TransportErrorKind::Dns, "dns error"),
            RequestError::transport(TransportErrorKind::Network, "reset"),
            RequestError::transport(TransportErrorKind::TimedOut, "operation timed out"),
            RequestError::transport(TransportErrorKind::Request, "bad"),
            RequestError::InvalidRequest("relative URL without a base".into()),
            RequestError::Decode("expected value".into()),
        ]
    }

    #[test]
    fn test_torn_down_liveness_silences_everything() {
        let liveness = Liveness::new();
        liveness.revoke();
        for err in every_error_kind() {
            assert_eq!(classify(&err, &liveness), None, "{err:?}");
        }
    }

    #[test]
    fn test_cancellation_is_silent() {
        let liveness = Liveness::new();
        // Mentions a timeout, but cancellation wins.
        let err = RequestError::cancelled("attempt 2 timed out");
        assert_eq!(classify(&err, &liveness), None);
        assert_eq!(classify(&RequestError::TornDown, &liveness), None);
    }

    #[test]
    fn test_unreachable_maps_to_fixed_message() {
        let liveness = Liveness::new();
        for kind in [
            TransportErrorKind::ConnectionRefused,
            TransportErrorKind::Dns,
            TransportErrorKind::Network,
        ] {
            let err = RequestError::transport(kind, "boom");
            assert_eq!(
                classify(&err, &liveness).as_deref(),
                Some(CANNOT_REACH_SERVER)
            );
        }

        let err = RequestError::InvalidRequest("TypeError: Failed to fetch".into());
        assert_eq!(
            classify(&err, &liveness).as_deref(),
            Some(CANNOT_REACH_SERVER)
        );
    }

    #[test]
    fn test_timeout_maps_to_fixed_message() {
        let liveness = Liveness::new();
        let err = RequestError::transport(TransportErrorKind::TimedOut, "deadline");
        assert_eq!(classify(&err, &liveness).as_deref(), Some(REQUEST_TIMED_OUT));

        let err = RequestError::transport(TransportErrorKind::Request, "upstream timed out");
        assert_eq!(classify(&err, &liveness).as_deref(), Some(REQUEST_TIMED_OUT));
    }

    #[test]
    fn test_fallback_uses_error_message() {
        let liveness = Liveness::new();
        let err = RequestError::Decode("expected value at line 1".into());
        assert_eq!(
            classify(&err, &liveness),
            Some("failed to decode response: expected value at line 1".to_string())
        );
    }
}
