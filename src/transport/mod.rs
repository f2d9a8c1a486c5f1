//! Transport boundary.
//!
//! # Data Flow
//! ```text
//! RetryingExecutor
//!     → ApiRequest (method, url, merged headers, body)
//!     → Transport::send(request, attempt token)
//!     → ApiResponse (any status) or RequestError
//! ```
//!
//! # Design Decisions
//! - The transport is opaque; the executor never looks inside it
//! - Every transport must honour the attempt token (see `CancellationToken::guard`)
//! - A response with any status code is a successful transport call

pub mod credentials;
pub mod http;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cancellation::CancellationToken;
use crate::errors::{RequestError, RequestResult};

pub use credentials::{CredentialStore, NoCredentials, SessionCredentials};
pub use http::ReqwestTransport;

/// The request primitive the executor wraps.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one network round trip, giving up when `signal` fires.
    async fn send(&self, request: ApiRequest, signal: &CancellationToken)
        -> RequestResult<ApiResponse>;
}

/// A single outgoing request, before the executor adds standard headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Add a caller header; it overrides the executor's standard headers.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> RequestResult<Self> {
        let bytes =
            serde_json::to_vec(body).map_err(|e| RequestError::InvalidRequest(e.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }
}

/// A fully read response. Non-2xx statuses are still responses.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> RequestResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| RequestError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Brand {
        id: u32,
        name: String,
    }

    #[test]
    fn test_json_body_round_trip() {
        let brand = Brand {
            id: 7,
            name: "acme".into(),
        };
        let request = ApiRequest::post("http://localhost/brands").json(&brand).unwrap();
        assert_eq!(request.method, Method::POST);

        let response = ApiResponse::new(StatusCode::CREATED).with_body(request.body.unwrap());
        assert!(response.is_success());
        assert_eq!(response.json::<Brand>().unwrap(), brand);
    }

    #[test]
    fn test_decode_failure() {
        let response = ApiResponse::new(StatusCode::OK).with_body("<html>");
        let err = response.json::<Brand>().unwrap_err();
        assert!(matches!(err, RequestError::Decode(_)));
        assert_eq!(response.text(), "<html>");
    }
}
