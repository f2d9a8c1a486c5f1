//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Host creates a Session (registry.rs owns Liveness + key → token map)
//!     → session.fetch(key, request) supersedes the previous operation for key
//!     → executor runs under the key's token
//!     → key released when the operation settles
//!
//! Host teardown (session.teardown / signals.rs on Ctrl+C):
//!     → liveness flipped false → every token cancelled → map cleared
//! ```
//!
//! # Design Decisions
//! - Teardown is explicit and idempotent; dropping the registry also tears down
//! - Active → Torn Down is one-way and terminal
//! - One mutex guards the map and the teardown transition

pub mod registry;
pub mod session;
pub mod signals;

pub use registry::ControllerRegistry;
pub use session::Session;
