//! Per-owner registry of cancellation tokens.
//!
//! # Responsibilities
//! - Hand out one token per logical operation key
//! - Supersede the previous operation when a key is reused
//! - Tear everything down exactly once when the owner goes away

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cancellation::{CancellationToken, Liveness};
use crate::observability::metrics;

/// Reason given to a token replaced by a newer operation under the same key.
pub const SUPERSEDED: &str = "superseded";

/// Reason given to tokens cancelled by registry teardown.
pub const TORN_DOWN: &str = "torn down";

/// Registry of named cancellation tokens tied to one owner's lifetime.
///
/// Invariant: at most one live token per key. After [`cleanup_all`] the
/// registry is empty and stays empty.
///
/// [`cleanup_all`]: ControllerRegistry::cleanup_all
#[derive(Debug)]
pub struct ControllerRegistry {
    liveness: Liveness,
    controllers: Mutex<HashMap<String, CancellationToken>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self {
            liveness: Liveness::new(),
            controllers: Mutex::new(HashMap::new()),
        }
    }

    /// The owner's liveness flag; clones observe teardown.
    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn is_active(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Return a fresh token for `key`, disposing any token already stored there.
    ///
    /// After teardown the returned token is already signaled and not stored.
    pub fn get_controller(&self, key: &str) -> CancellationToken {
        let mut controllers = self.controllers();

        if !self.liveness.is_alive() {
            let token = CancellationToken::new();
            token.abort(TORN_DOWN);
            return token;
        }

        if let Some(previous) = controllers.remove(key) {
            tracing::debug!(key, "Superseding in-flight operation");
            previous.abort(SUPERSEDED);
            previous.dispose();
            metrics::record_cancellation("superseded");
        }

        let token = CancellationToken::new();
        controllers.insert(key.to_string(), token.clone());
        token
    }

    /// Dispose and forget the token under `key`. No-op if absent.
    pub fn cleanup_controller(&self, key: &str) {
        let removed = self.controllers().remove(key);
        if let Some(token) = removed {
            token.dispose();
        }
    }

    /// Forget `key` only if it still maps to `token`.
    pub(crate) fn release(&self, key: &str, token: &CancellationToken) {
        let mut controllers = self.controllers();
        if controllers.get(key).is_some_and(|current| current.same_as(token)) {
            controllers.remove(key);
        }
        drop(controllers);
        token.dispose();
    }

    /// Flip liveness, cancel every token and clear the map. Idempotent.
    pub fn cleanup_all(&self) {
        let mut controllers = self.controllers();
        let first = self.liveness.revoke();

        let live = controllers.len();
        for token in controllers.values() {
            token.abort(TORN_DOWN);
            token.dispose();
        }
        controllers.clear();

        if first {
            tracing::debug!(cancelled = live, "Controller registry torn down");
            metrics::record_teardown(live);
        }
    }

    pub fn len(&self) -> usize {
        self.controllers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers().is_empty()
    }

    /// Keys with a live operation, sorted.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.controllers().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn controllers(&self) -> MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ControllerRegistry {
    fn drop(&mut self) {
        self.cleanup_all();
    }
}
