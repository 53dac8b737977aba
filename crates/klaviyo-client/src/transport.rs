//! HTTP transport seam.
//!
//! The client hands a plain [`HttpRequest`] to an [`HttpTransport`] and gets a
//! plain [`HttpResponse`] back. Non-2xx statuses are ordinary responses; only
//! failures to complete the round-trip are errors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use klaviyo_core::{HttpMethod, HttpRequest, HttpResponse, KlaviyoError, Result};

/// Executes HTTP requests on behalf of the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request and return whatever status and body came back.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// Create a transport with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| KlaviyoError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(KlaviyoError::transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(KlaviyoError::transport)?;

        Ok(HttpResponse { status, body })
    }
}
