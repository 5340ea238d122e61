//! Request execution: build, send under a deadline, retry, interpret.
//!
//! # Design
//! `build_request` is pure and turns a `RequestSpec` into the `HttpRequest`
//! a transport sends. `execute` drives the attempts. Only
//! `Outcome::TransportFailure` is retried; an HTTP error response is an
//! answer from the server and is translated straight away.

use serde_json::Value;
use tracing::{debug, trace};
use url::form_urlencoded;

use crate::config::{BodyEncoding, ClientConfig};
use crate::decode::decode_body;
use crate::error::{translate, ClientError};
use crate::http::{HttpRequest, Outcome, Transport};
use crate::types::{Query, RequestSpec};

/// Turn a `RequestSpec` into the wire request for `config`.
///
/// Fails with `InvalidRequest` when the URL is not absolute, a header is not
/// legal on the wire, or the body cannot be expressed in the configured
/// encoding.
pub fn build_request(config: &ClientConfig, spec: &RequestSpec) -> Result<HttpRequest, ClientError> {
    let mut url = join_url(&config.base_uri, spec.path());
    if let Some(query) = spec.query().filter(|q| !q.is_empty()) {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&encode_query(query));
    }
    if let Err(e) = url::Url::parse(&url) {
        return Err(ClientError::InvalidRequest(Some(format!("invalid URL {url:?}: {e}"))));
    }

    let mut headers = vec![
        ("user-agent".to_string(), config.user_agent.clone()),
        ("accept".to_string(), "application/json".to_string()),
    ];
    for (name, value) in &config.default_headers {
        set_header(&mut headers, name, value);
    }

    let body = match spec.body() {
        Some(body) => {
            let encoded = match config.body_encoding {
                BodyEncoding::Json => serde_json::to_string(body)
                    .map_err(|e| ClientError::InvalidRequest(Some(e.to_string())))?,
                BodyEncoding::Form => encode_form(body)?,
            };
            set_header(&mut headers, "content-type", config.body_encoding.content_type());
            Some(encoded)
        }
        None => None,
    };
    for (name, value) in &headers {
        check_header(name, value)?;
    }

    Ok(HttpRequest {
        method: spec.method(),
        url,
        headers,
        body,
    })
}

/// Run one call to completion.
pub async fn execute<T: Transport>(
    config: &ClientConfig,
    transport: &T,
    spec: &RequestSpec,
) -> Result<Value, ClientError> {
    let request = build_request(config, spec)?;
    trace!(
        method = %spec.method(),
        path = spec.path(),
        query = ?spec.query(),
        headers = ?request.headers,
        body = ?request.body,
        "sending request"
    );

    let mut attempts: u32 = 0;
    let outcome = loop {
        attempts += 1;
        match attempt(config, transport, &request).await {
            Outcome::TransportFailure { is_timeout, reason } if attempts <= config.retry_count => {
                debug!(
                    url = %request.url,
                    attempt = attempts,
                    retries = config.retry_count,
                    is_timeout,
                    %reason,
                    "transport failure, retrying"
                );
                if let Some(delay) = config.backoff(attempts - 1) {
                    tokio::time::sleep(delay).await;
                }
            }
            outcome => break outcome,
        }
    };

    match outcome {
        Outcome::Success(response) => {
            trace!(
                status = response.status,
                headers = ?response.headers,
                body = %String::from_utf8_lossy(&response.body),
                attempts,
                "request completed"
            );
            decode_body(&response.body)
        }
        Outcome::HttpFailure(response) => {
            trace!(
                status = response.status,
                headers = ?response.headers,
                body = %String::from_utf8_lossy(&response.body),
                attempts,
                "request completed"
            );
            // A body that is not UTF-8 carries no usable errorMessage.
            let text = std::str::from_utf8(&response.body).unwrap_or_default();
            Err(translate(response.status, text))
        }
        Outcome::TransportFailure { is_timeout, reason } => {
            trace!(is_timeout, %reason, attempts, "request abandoned");
            Err(ClientError::Timeout(Some(reason)))
        }
        Outcome::Unsendable { reason } => {
            trace!(%reason, attempts, "request rejected by transport");
            Err(ClientError::InvalidRequest(Some(reason)))
        }
    }
}

/// One exchange, bounded by the config's attempt deadline. Dropping the
/// transport future on expiry cancels the exchange.
async fn attempt<T: Transport>(config: &ClientConfig, transport: &T, request: &HttpRequest) -> Outcome {
    let Some(deadline) = config.attempt_deadline() else {
        return transport.send(request).await;
    };
    match tokio::time::timeout(deadline, transport.send(request)).await {
        Ok(outcome) => outcome,
        Err(_) => Outcome::timed_out(format!("no response within {}ms", deadline.as_millis())),
    }
}

fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

fn encode_query(query: &Query) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn encode_form(body: &Value) -> Result<String, ClientError> {
    let Value::Object(fields) = body else {
        return Err(ClientError::InvalidRequest(Some(
            "form bodies must be JSON objects".to_string(),
        )));
    };
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        let value = match value {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ClientError::InvalidRequest(Some(format!(
                    "form field {key:?} is not a scalar"
                ))));
            }
        };
        serializer.append_pair(key, &value);
    }
    Ok(serializer.finish())
}

fn check_header(name: &str, value: &str) -> Result<(), ClientError> {
    if ::http::HeaderName::from_bytes(name.as_bytes()).is_err() {
        return Err(ClientError::InvalidRequest(Some(format!("invalid header name {name:?}"))));
    }
    if ::http::HeaderValue::from_str(value).is_err() {
        return Err(ClientError::InvalidRequest(Some(format!(
            "invalid value for header {name:?}"
        ))));
    }
    Ok(())
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        Some(slot) => slot.1 = value.to_string(),
        None => headers.push((name.to_ascii_lowercase(), value.to_string())),
    }
}
