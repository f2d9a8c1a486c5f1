//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LifecycleConfig (validated, immutable)
//!     → RetryPolicy::from_config / Session::from_config
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal (or no) config files
//! - Validation separates syntactic (serde) from semantic checks
//! - Per-call overrides go through `RetryPolicy` builders, not config mutation

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ApiConfig, LifecycleConfig, ObservabilityConfig, RetryConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
