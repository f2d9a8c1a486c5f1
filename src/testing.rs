//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::cancellation::CancellationToken;
use crate::errors::{RequestError, RequestResult, TransportErrorKind};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// What the mock does for one call.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(StatusCode),
    Fail(TransportErrorKind),
    Cancel,
    /// Wait for the attempt token, like a well-behaved transport.
    Hang,
    /// Respond after a delay, ignoring the attempt token.
    RespondLate(Duration, StatusCode),
}

/// Replays `steps` in order; the last step repeats forever.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicU32,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new([step])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps.front().cloned().expect("script must not be empty")
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: ApiRequest,
        signal: &CancellationToken,
    ) -> RequestResult<ApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match self.next_step() {
            Step::Respond(status) => Ok(ApiResponse::new(status)),
            Step::Fail(kind) => Err(RequestError::transport(kind, "TypeError: Failed to fetch")),
            Step::Cancel => Err(RequestError::cancelled("The user aborted a request.")),
            Step::Hang => {
                signal.cancelled().await;
                Err(signal.cancellation_error())
            }
            Step::RespondLate(delay, status) => {
                tokio::time::sleep(delay).await;
                Ok(ApiResponse::new(status))
            }
        }
    }
}
