//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Logical request:
//!     → retries.rs (liveness check, fresh token per attempt)
//!     → token armed with policy.timeout (per-attempt deadline)
//!     → On transport failure: backoff.rs (capped exponential delay), next attempt
//!     → On cancellation: stop immediately
//! ```
//!
//! # Design Decisions
//! - Every attempt has a deadline; the deadline is a cancellation, not a retry trigger
//! - Status codes are returned as-is; only failed transport calls are retried
//! - Backoff is a pure function of the attempt index

pub mod backoff;
pub mod policy;
pub mod retries;

pub use backoff::Backoff;
pub use policy::RetryPolicy;
pub use retries::{RetryingExecutor, X_REQUEST_ID};
