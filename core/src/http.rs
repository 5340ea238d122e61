//! Wire-level types and the transport seam.
//!
//! # Design
//! The executor describes a request as plain data and hands it to a
//! `Transport`. A transport performs exactly one exchange and reports an
//! `Outcome`; it never interprets the body and never retries. Everything
//! above this seam is independent of the HTTP library in use.

use std::fmt;
use std::future::Future;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data. `url` already carries the
/// encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data. The body is kept as raw bytes;
/// UTF-8 is checked when it is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A 2xx response.
    Success(HttpResponse),
    /// A well-formed response with any other status.
    HttpFailure(HttpResponse),
    /// No response at all: DNS, connect, I/O, or a deadline.
    TransportFailure { is_timeout: bool, reason: String },
    /// The transport refused to put the request on the wire. Never retried.
    Unsendable { reason: String },
}

impl Outcome {
    /// Classify a received response by status.
    pub fn from_response(response: HttpResponse) -> Self {
        if (200..300).contains(&response.status) {
            Outcome::Success(response)
        } else {
            Outcome::HttpFailure(response)
        }
    }

    pub fn timed_out(reason: impl Into<String>) -> Self {
        Outcome::TransportFailure {
            is_timeout: true,
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::TransportFailure {
            is_timeout: false,
            reason: reason.into(),
        }
    }

    pub fn unsendable(reason: impl Into<String>) -> Self {
        Outcome::Unsendable {
            reason: reason.into(),
        }
    }
}

/// Performs one network exchange.
///
/// Implementations must report every failure as an `Outcome` rather than
/// panicking, and must be safe to call concurrently.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Outcome> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Outcome> + Send {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[test]
    fn two_hundreds_are_success() {
        for status in [200, 201, 204, 299] {
            assert!(matches!(Outcome::from_response(response(status)), Outcome::Success(_)));
        }
    }

    #[test]
    fn everything_else_is_http_failure() {
        for status in [100, 199, 301, 404, 502] {
            assert!(matches!(
                Outcome::from_response(response(status)),
                Outcome::HttpFailure(_)
            ));
        }
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }
}
