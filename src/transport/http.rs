//! reqwest-backed transport.

use async_trait::async_trait;
use url::Url;

use crate::cancellation::CancellationToken;
use crate::errors::RequestResult;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Default transport issuing requests through a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: ApiRequest,
        signal: &CancellationToken,
    ) -> RequestResult<ApiResponse> {
        let url = Url::parse(&request.url)?;
        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // Body read is covered too: a timeout mid-stream still cancels.
        signal
            .guard(async move {
                let response = builder.send().await?;
                let status = response.status();
                let headers = response.headers().clone();
                let body = response.bytes().await?.to_vec();
                Ok(ApiResponse {
                    status,
                    headers,
                    body,
                })
            })
            .await
    }
}
