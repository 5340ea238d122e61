//! Async transport backed by reqwest.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Outcome, Transport};

/// Sends requests with a shared `reqwest::Client`.
///
/// The request timeout bounds connection setup; the response timeout bounds
/// the whole exchange.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.response_timeout() {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| ClientError::Failure(Some(format!("failed to build HTTP client: {e}"))))?;
        Ok(Self { inner })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };
        let mut builder = self.inner.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, headers, body })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Outcome {
        match self.exchange(request).await {
            Ok(response) => Outcome::from_response(response),
            Err(e) if e.is_builder() => Outcome::unsendable(e.to_string()),
            Err(e) => Outcome::TransportFailure {
                is_timeout: e.is_timeout(),
                reason: e.to_string(),
            },
        }
    }
}
