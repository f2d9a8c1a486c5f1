//! Request lifecycle metrics.
//!
//! # Metrics
//! - `api_requests_total` (counter): logical requests by final outcome
//! - `api_retries_total` (counter): backoff waits started
//! - `api_cancellations_total` (counter): cancellations by source
//! - `api_registry_teardowns_total` (counter): registries torn down
//! - `api_tokens_cancelled_on_teardown_total` (counter): tokens still live at teardown

/// Record the final outcome of a logical request.
pub fn record_request(outcome: &'static str) {
    ::metrics::counter!("api_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_retry() {
    ::metrics::counter!("api_retries_total").increment(1);
}

/// Record a cancellation (`attempt`, `backoff`, `superseded`, `teardown`).
pub fn record_cancellation(source: &'static str) {
    ::metrics::counter!("api_cancellations_total", "source" => source).increment(1);
}

pub fn record_teardown(live_tokens: usize) {
    ::metrics::counter!("api_registry_teardowns_total").increment(1);
    ::metrics::counter!("api_tokens_cancelled_on_teardown_total").increment(live_tokens as u64);
}
