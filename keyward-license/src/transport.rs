//! HTTP transport used to reach the license authority.

use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every call to the license authority.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The HTTP capabilities the license core needs from its host.
///
/// Any response that arrives, whatever its status code, is `Ok`. Only a
/// failure to get a response at all is a [`TransportError`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs `form` as `application/x-www-form-urlencoded`.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;

    /// GETs `url` with `query` appended as query parameters.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with its own client.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("keyward/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;
        debug!("license authority responded with HTTP {status} ({} bytes)", body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .form(form)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Self::read(response).await
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Self::read(response).await
    }
}
