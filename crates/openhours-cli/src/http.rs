use std::time::Duration;

use anyhow::Context;
use openhours_core::{ApiError, ApiRequest, Transport};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, instrument};

/// Native HTTP transport for [`openhours_core::ApiClient`].
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building HTTP client")?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn get(&self, request: &ApiRequest) -> Result<String, ApiError> {
        let transport_error = |err: reqwest::Error| ApiError::Transport {
            url: request.url.clone(),
            message: err.to_string(),
        };

        let response = self
            .http
            .get(&request.url)
            .query(&request.query)
            .header(ACCEPT, request.format.accept_header())
            .header(ACCEPT_LANGUAGE, &request.language)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");
        Ok(body)
    }
}
