//! Retrying request executor.
//!
//! # Responsibilities
//! - Refuse to start an attempt once the caller is torn down
//! - Give every attempt its own cancellation token and deadline
//! - Retry failed transport calls with capped exponential backoff
//! - Stop at once on any cancellation
//!
//! # Design Decisions
//! - Timeouts are cancellations: a timed-out attempt is never retried
//! - Non-2xx responses are returned, not retried
//! - Credentials are read per attempt so a refreshed token applies to retries
//! - The same `x-request-id` is sent on every attempt of one logical request

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use uuid::Uuid;

use crate::cancellation::{CancellationToken, Liveness};
use crate::errors::{RequestError, RequestResult};
use crate::observability::metrics;
use crate::resilience::policy::RetryPolicy;
use crate::transport::{ApiRequest, ApiResponse, CredentialStore, NoCredentials, Transport};

/// Correlation header shared by all attempts of a logical request.
pub const X_REQUEST_ID: &str = "x-request-id";

const APPLICATION_JSON: &str = "application/json";

/// Issues logical requests through a [`Transport`] under a [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingExecutor {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
}

impl RetryingExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credentials: Arc::new(NoCredentials),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Execute `request`, retrying transport failures.
    ///
    /// Makes between 1 and `policy.max_retries + 1` transport calls. When
    /// `signal` is given, each attempt token is its child, so aborting it
    /// cancels the in-flight attempt and any pending backoff wait.
    pub async fn execute(
        &self,
        request: ApiRequest,
        policy: &RetryPolicy,
        liveness: &Liveness,
        signal: Option<&CancellationToken>,
    ) -> RequestResult<ApiResponse> {
        let request_id = Uuid::new_v4().to_string();
        let mut attempt: u32 = 0;

        loop {
            if !liveness.is_alive() {
                tracing::debug!(request_id = %request_id, attempt, "Caller torn down, not sending");
                metrics::record_request("torn_down");
                return Err(RequestError::TornDown);
            }

            let prepared = self.prepare(&request, &request_id)?;
            let token = match signal {
                Some(parent) => CancellationToken::child_of(parent),
                None => CancellationToken::new(),
            };
            token.arm(policy.timeout, format!("attempt {attempt} timed out"));

            tracing::debug!(
                request_id = %request_id,
                attempt,
                method = %prepared.method,
                url = %prepared.url,
                "Sending request"
            );

            // The deadline wins even over a transport that ignores the token.
            let result = token.guard(self.transport.send(prepared, &token)).await;
            let signaled = token.is_signaled();
            token.dispose();

            let err = match result {
                Ok(_) if signaled => token.cancellation_error(),
                Ok(response) => {
                    tracing::debug!(
                        request_id = %request_id,
                        attempt,
                        status = %response.status,
                        "Request completed"
                    );
                    metrics::record_request("response");
                    return Ok(response);
                }
                Err(err) => err,
            };

            if err.is_cancellation() || signaled {
                let err = if err.is_cancellation() {
                    err
                } else {
                    token.cancellation_error()
                };
                tracing::debug!(request_id = %request_id, attempt, error = %err, "Request cancelled");
                metrics::record_cancellation("attempt");
                metrics::record_request("cancelled");
                return Err(err);
            }

            if attempt >= policy.max_retries {
                tracing::warn!(
                    request_id = %request_id,
                    attempts = attempt + 1,
                    error = %err,
                    "Request failed, retries exhausted"
                );
                metrics::record_request("failed");
                return Err(err);
            }

            let delay = policy.backoff.delay(attempt);
            tracing::info!(
                request_id = %request_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying after transport error"
            );
            metrics::record_retry();

            match signal {
                Some(parent) => {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = parent.cancelled() => {
                            tracing::debug!(request_id = %request_id, "Cancelled during backoff");
                            metrics::record_cancellation("backoff");
                            metrics::record_request("cancelled");
                            return Err(parent.cancellation_error());
                        }
                    }
                }
                None => tokio::time::sleep(delay).await,
            }

            attempt += 1;
        }
    }

    /// Merge standard headers, the bearer credential and the caller's headers.
    fn prepare(&self, request: &ApiRequest, request_id: &str) -> RequestResult<ApiRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

        if let Some(token) = self.credentials.bearer_token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RequestError::InvalidRequest(format!("bearer credential: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let id = HeaderValue::from_str(request_id)
            .map_err(|e| RequestError::InvalidRequest(e.to_string()))?;
        headers.insert(HeaderName::from_static(X_REQUEST_ID), id);

        // Caller headers win, including multi-valued ones.
        for name in request.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in &request.headers {
            headers.append(name.clone(), value.clone());
        }

        Ok(ApiRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers,
            body: request.body.clone(),
        })
    }
}
