//! One-shot cancellation token with an optional timeout timer.
//!
//! # Responsibilities
//! - Carry a signal that flips exactly once (unsignaled → signaled)
//! - Remember why it fired (timeout, abort, dispose, parent)
//! - Own at most one pending timeout timer
//!
//! # Design Decisions
//! - The signal and wake-up notification come from `tokio_util`'s token
//! - The timer task holds only a weak reference, so an abandoned token is freed
//! - Child tokens fire with their parent but never fire the parent

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken as Signal;

use crate::errors::{RequestError, RequestResult};

/// Reason recorded by [`CancellationToken::dispose`] when nothing fired first.
pub const DISPOSED: &str = "disposed";

const CANCELLED: &str = "cancelled";

/// Handle to a single cancellable operation. Clones share the same signal.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    signal: Signal,
    reason: OnceLock<String>,
    timer: Mutex<Option<JoinHandle<()>>>,
    parent: Option<CancellationToken>,
}

impl CancellationToken {
    /// Create an unsignaled token.
    pub fn new() -> Self {
        Self::from_parts(Signal::new(), None)
    }

    /// Create a token that is signaled whenever `parent` is.
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self::from_parts(parent.inner.signal.child_token(), Some(parent.clone()))
    }

    fn from_parts(signal: Signal, parent: Option<CancellationToken>) -> Self {
        Self {
            inner: Arc::new(Inner {
                signal,
                reason: OnceLock::new(),
                timer: Mutex::new(None),
                parent,
            }),
        }
    }

    /// Schedule a one-shot timer that aborts the token with `reason`.
    ///
    /// Only one timer may be pending; arming again replaces the previous one.
    /// Must be called from within a Tokio runtime.
    pub fn arm(&self, duration: Duration, reason: impl Into<String>) {
        if self.is_signaled() {
            return;
        }

        let reason = reason.into();
        let weak = Arc::downgrade(&self.inner);
        let signal = self.inner.signal.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {
                    if let Some(inner) = weak.upgrade() {
                        tracing::debug!(reason = %reason, "Cancellation timer fired");
                        CancellationToken { inner }.abort(reason);
                    }
                }
                _ = signal.cancelled() => {}
            }
        });

        if let Some(previous) = self.timer().replace(handle) {
            tracing::warn!("Cancellation token armed twice, replacing pending timer");
            previous.abort();
        }
    }

    /// Signal cancellation now. Later calls are no-ops.
    pub fn abort(&self, reason: impl Into<String>) {
        if self.is_signaled() {
            return;
        }
        // Reason is stored before the signal so observers always see it.
        let _ = self.inner.reason.set(reason.into());
        self.inner.signal.cancel();
    }

    /// Clear any pending timer and signal with [`DISPOSED`] if still unsignaled.
    pub fn dispose(&self) {
        if let Some(timer) = self.timer().take() {
            timer.abort();
        }
        self.abort(DISPOSED);
    }

    pub fn is_signaled(&self) -> bool {
        self.inner.signal.is_cancelled()
    }

    /// Why the token fired, or `None` while it is still live.
    pub fn reason(&self) -> Option<String> {
        if !self.is_signaled() {
            return None;
        }
        if let Some(reason) = self.inner.reason.get() {
            return Some(reason.clone());
        }
        match &self.inner.parent {
            Some(parent) => parent.reason(),
            None => Some(CANCELLED.to_string()),
        }
    }

    /// Wait until the token is signaled.
    pub async fn cancelled(&self) {
        self.inner.signal.cancelled().await;
    }

    /// Run `future` unless the token fires first.
    pub async fn guard<F, T>(&self, future: F) -> RequestResult<T>
    where
        F: Future<Output = RequestResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(self.cancellation_error()),
            result = future => result,
        }
    }

    /// The error a cancelled operation under this token reports.
    pub fn cancellation_error(&self) -> RequestError {
        RequestError::cancelled(self.reason().unwrap_or_else(|| CANCELLED.to_string()))
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// True if both handles refer to the same token.
    pub fn same_as(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let timer = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(timer) = timer {
            timer.abort();
        }
    }
}
