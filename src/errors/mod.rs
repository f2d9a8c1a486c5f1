//! Error subsystem.
//!
//! # Data Flow
//! ```text
//! transport / executor failure
//!     → types.rs (RequestError taxonomy)
//!     → executor decides retry vs. rethrow
//!     → classify.rs (final rejection → user-facing text or nothing)
//! ```
//!
//! # Design Decisions
//! - Cancellation and torn-down errors are never retried and never shown
//! - Classification consults liveness before looking at the error
//! - Status codes are not errors; they arrive as responses

pub mod classify;
pub mod types;

pub use classify::{classify, CANNOT_REACH_SERVER, REQUEST_TIMED_OUT};
pub use types::{RequestError, RequestResult, TransportErrorKind};
