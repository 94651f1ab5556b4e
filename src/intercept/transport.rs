use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::common::errors::EngineError;
use crate::engine::EngineContext;
use crate::intercept::classify::classify;

/// One outbound call as the host issues it.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The request/response transport seam. The engine never replaces the host's
/// transport, it decorates one that is injected here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EngineError>;
}

/// Real outbound transport backed by a shared HTTP client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EngineError> {
        let response = self.client.get(&request.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

/// Transparent observation wrapper around a transport.
///
/// The caller gets exactly what the inner transport produced, errors
/// included. For calls that classify as metadata endpoints, a copy of the
/// body is handed to ingestion off the caller's path; ingestion failures are
/// swallowed and can never affect the response.
pub struct InterceptingTransport<T: Transport> {
    inner: T,
    ctx: Arc<EngineContext>,
}

impl<T: Transport> InterceptingTransport<T> {
    pub fn new(inner: T, ctx: Arc<EngineContext>) -> Self {
        Self { inner, ctx }
    }
}

#[async_trait]
impl<T: Transport> Transport for InterceptingTransport<T> {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EngineError> {
        let response = self.inner.execute(request.clone()).await?;

        if classify(&request.url, &self.ctx.platform).is_some() {
            let ctx = Arc::clone(&self.ctx);
            let url = request.url;
            let body = response.body.clone();
            tokio::spawn(async move {
                match serde_json::from_str::<Value>(&body) {
                    Ok(payload) => ctx.ingest_response(&url, &payload),
                    Err(err) => debug!("dropping unparseable payload from {}: {}", url, err),
                }
            });
        }

        Ok(response)
    }
}
