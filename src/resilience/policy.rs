//! Per-call retry policy.

use std::time::Duration;

use crate::config::LifecycleConfig;
use crate::resilience::backoff::Backoff;

/// Timeout, retry count and backoff for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline for each individual attempt.
    pub timeout: Duration,
    /// Retries after the first attempt (total calls <= max_retries + 1).
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn from_config(config: &LifecycleConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeouts.request_ms),
            max_retries: config.retries.max_retries,
            backoff: Backoff::new(
                Duration::from_millis(config.retries.base_delay_ms),
                Duration::from_millis(config.retries.max_delay_ms),
            ),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LifecycleConfig::default())
    }
}
