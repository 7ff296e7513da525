use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{AdmError, Result};
use crate::transport::{HttpTransport, OutboundRequest, RawResponse, TransportError};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AdmError::Client(e.to_string()))?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let OutboundRequest { url, headers, body } = request;
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::new(&url, e))?;

        let status = response.status();
        // error bodies are read the same way as success bodies
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(&url, e))?;
        debug!(url = %url, status = status.as_u16(), "http exchange completed");
        Ok(RawResponse { status, body })
    }
}
