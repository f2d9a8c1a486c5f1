//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, backoff cap >= base)
//! - Check the base URL and log filter parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LifecycleConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::LifecycleConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.request_ms must be greater than zero")]
    ZeroTimeout,

    #[error("retries.base_delay_ms must be greater than zero")]
    ZeroBackoffBase,

    #[error("retries.max_delay_ms ({max}) must be at least retries.base_delay_ms ({base})")]
    BackoffCapBelowBase { base: u64, max: u64 },

    #[error("api.base_url is not a valid absolute URL: {0}")]
    InvalidBaseUrl(String),

    #[error("observability.log_level is not a valid filter: {0}")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &LifecycleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let retries = &config.retries;
    if retries.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBackoffBase);
    }
    if retries.max_delay_ms < retries.base_delay_ms {
        errors.push(ValidationError::BackoffCapBelowBase {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }

    if let Some(base_url) = &config.api.base_url {
        if Url::parse(base_url).is_err() {
            errors.push(ValidationError::InvalidBaseUrl(base_url.clone()));
        }
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
