//! Request lifecycle control for API clients.
//!
//! Cancellable, time-bounded, retrying HTTP calls owned by a host that can
//! go away at any moment (a UI view, a CLI command, a background job).
//!
//! # Architecture Overview
//!
//! ```text
//!    Host (view / command / job)
//!    ──────────────────────────┐
//!                              ▼
//!                      ┌──────────────┐      teardown()      ┌──────────────┐
//!                      │   Session    │─────────────────────▶│  Controller  │
//!                      │ fetch(key,…) │   get_controller()   │   Registry   │
//!                      └──────┬───────┘─────────────────────▶│ key → token  │
//!                             │                              │  + Liveness  │
//!                             ▼                              └──────────────┘
//!                      ┌──────────────┐
//!                      │   Retrying   │  per attempt: child token + deadline
//!                      │   Executor   │  between attempts: capped backoff
//!                      └──────┬───────┘
//!                             │ ApiRequest + attempt token
//!                             ▼
//!                      ┌──────────────┐
//!                      │  Transport   │  reqwest, or a test double
//!                      └──────┬───────┘
//!                             │ ApiResponse | RequestError
//!                             ▼
//!                      ┌──────────────┐
//!                      │  classify()  │  user-facing text, or silence once
//!                      └──────────────┘  the host is torn down
//!
//!    Cross-cutting: config (TOML) · observability (tracing + metrics)
//! ```

pub mod cancellation;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod transport;

#[cfg(test)]
mod testing;

pub use cancellation::{CancellationToken, Liveness};
pub use config::LifecycleConfig;
pub use errors::{classify, RequestError, RequestResult};
pub use lifecycle::{ControllerRegistry, Session};
pub use resilience::{RetryPolicy, RetryingExecutor};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
