//! Blocking transport backed by ureq, run on tokio's blocking pool.
//!
//! Status codes come back as data (`http_status_as_error(false)`), so only
//! connection-level problems become transport failures. When the executor's
//! deadline fires first the caller is released immediately; the worker thread
//! is bounded by ureq's own timeouts, including one on the whole exchange, so
//! a stalled body cannot pin it.

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Outcome, Transport};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(config.request_timeout())
            .timeout_send_request(config.request_timeout())
            .timeout_recv_response(config.response_timeout())
            .timeout_recv_body(config.response_timeout())
            .timeout_global(config.attempt_deadline())
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: &HttpRequest) -> Outcome {
        let agent = self.agent.clone();
        let request = request.clone();
        match tokio::task::spawn_blocking(move || exchange(&agent, request)).await {
            Ok(Ok(response)) => Outcome::from_response(response),
            Ok(Err(e @ ureq::Error::Timeout(_))) => Outcome::timed_out(e.to_string()),
            Ok(Err(e @ (ureq::Error::BadUri(_) | ureq::Error::Http(_)))) => {
                Outcome::unsendable(e.to_string())
            }
            Ok(Err(e)) => Outcome::failed(e.to_string()),
            Err(e) => Outcome::failed(format!("transport task failed: {e}")),
        }
    }
}

fn exchange(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let mut response = match (request.method, request.body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&request.url), &request.headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&request.url), &request.headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&request.url), &request.headers).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            with_headers(agent.put(&request.url), &request.headers).send(body.as_bytes())
        }
        (HttpMethod::Put, None) => with_headers(agent.put(&request.url), &request.headers).send_empty(),
    }?;

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
    let body = response.body_mut().read_to_vec()?;
    Ok(HttpResponse { status, headers, body })
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
