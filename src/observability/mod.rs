//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! executor / registry / session produce:
//!     → tracing events (request_id, attempt, key, delay_ms)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Host binary:
//!     → logging.rs installs the subscriber once at startup
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers and recorders is the host's job
//! - Counters are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
