//! HTTP seam used by the token provider and the dispatcher.
//!
//! The engine only needs "send bytes, receive status + body"; everything
//! else (TLS, pooling, timeouts) lives behind [`HttpTransport`].

use http::{HeaderMap, StatusCode};
use thiserror::Error;

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

/// A fully prepared POST.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl OutboundRequest {
    pub fn new(url: String, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { url, headers, body }
    }
}

/// Status and body text of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Network-level failure (connection, DNS, TLS, timeout, unreadable body).
#[derive(Error, Debug)]
#[error("transport failure for {url}: {source}")]
pub struct TransportError {
    pub url: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(url: &str, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            url: url.to_owned(),
            source: source.into(),
        }
    }
}

pub trait HttpTransport: Send + Sync {
    fn post(
        &self,
        request: OutboundRequest,
    ) -> impl std::future::Future<Output = Result<RawResponse, TransportError>> + Send;
}
