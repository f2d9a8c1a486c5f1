//! Cancellation subsystem.
//!
//! # Data Flow
//! ```text
//! ControllerRegistry owns a Liveness + one CancellationToken per key
//!     → executor derives a child token per attempt
//!     → token.arm() schedules the attempt timeout
//!     → transport races its work against token.cancelled()
//!     → dispose() clears the timer once the attempt settles
//! ```
//!
//! # Design Decisions
//! - Signals are one-shot; nothing is ever un-cancelled
//! - The first reason recorded wins
//! - The armed timer is the only background task and dies with dispose()

pub mod liveness;
pub mod token;

pub use liveness::Liveness;
pub use token::CancellationToken;
