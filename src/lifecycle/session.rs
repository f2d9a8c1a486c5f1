//! Explicit request session for a host (UI view, CLI command, background job).

use std::sync::Arc;

use url::Url;

use crate::cancellation::Liveness;
use crate::config::LifecycleConfig;
use crate::errors::{classify, RequestError, RequestResult};
use crate::lifecycle::registry::ControllerRegistry;
use crate::resilience::{RetryPolicy, RetryingExecutor};
use crate::transport::{ApiRequest, ApiResponse};

/// Couples a [`ControllerRegistry`] to an executor and a default policy.
///
/// The host calls [`Session::teardown`] when it goes away; nothing the
/// session started can reach the host after that.
pub struct Session {
    registry: ControllerRegistry,
    executor: Arc<RetryingExecutor>,
    policy: RetryPolicy,
    base_url: Option<Url>,
}

impl Session {
    pub fn new(executor: Arc<RetryingExecutor>) -> Self {
        Self {
            registry: ControllerRegistry::new(),
            executor,
            policy: RetryPolicy::default(),
            base_url: None,
        }
    }

    /// Build a session using the configured base URL and retry policy.
    pub fn from_config(
        config: &LifecycleConfig,
        executor: Arc<RetryingExecutor>,
    ) -> RequestResult<Self> {
        let mut session = Self::new(executor).with_policy(RetryPolicy::from_config(config));
        if let Some(base_url) = &config.api.base_url {
            session = session.with_base_url(Url::parse(base_url)?);
        }
        Ok(session)
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn liveness(&self) -> &Liveness {
        self.registry.liveness()
    }

    pub fn is_active(&self) -> bool {
        self.registry.is_active()
    }

    /// Resolve `path` against the base URL (absolute URLs pass through).
    pub fn url(&self, path: &str) -> RequestResult<String> {
        let url = match &self.base_url {
            Some(base) => base.join(path)?,
            None => Url::parse(path)?,
        };
        Ok(url.to_string())
    }

    /// Run `request` as the current operation for `key` with the default policy.
    pub async fn fetch(&self, key: &str, request: ApiRequest) -> RequestResult<ApiResponse> {
        self.fetch_with_policy(key, request, &self.policy).await
    }

    /// Run `request` as the current operation for `key`.
    ///
    /// Any earlier operation under `key` is cancelled first. If this operation
    /// is itself superseded or the session is torn down before it settles, its
    /// outcome is discarded and a cancellation error is returned instead.
    pub async fn fetch_with_policy(
        &self,
        key: &str,
        request: ApiRequest,
        policy: &RetryPolicy,
    ) -> RequestResult<ApiResponse> {
        let token = self.registry.get_controller(key);
        let result = self
            .executor
            .execute(request, policy, self.registry.liveness(), Some(&token))
            .await;

        let stale = token.is_signaled();
        self.registry.release(key, &token);

        if !stale {
            return result;
        }

        match result {
            Err(err) if err.is_silent() => Err(err),
            Ok(response) => {
                tracing::debug!(key, status = %response.status, "Discarding late response");
                Err(token.cancellation_error())
            }
            Err(err) => {
                tracing::debug!(key, error = %err, "Discarding late failure");
                Err(token.cancellation_error())
            }
        }
    }

    /// Cancel the operation under `key`, if any.
    pub fn cancel(&self, key: &str) {
        self.registry.cleanup_controller(key);
    }

    /// User-facing text for `error`, or `None` when it must stay silent.
    pub fn classify(&self, error: &RequestError) -> Option<String> {
        classify(error, self.registry.liveness())
    }

    /// Tear the session down. Safe to call more than once.
    pub fn teardown(&self) {
        self.registry.cleanup_all();
    }
}
