//! Semantic error type and the status-code translator.
//!
//! # Design
//! `ClientError` is the only failure type that leaves the crate. Each variant
//! is a tag callers match on; the optional reason is diagnostic text only.
//! The status-to-kind mapping lives in `STATUS_TABLE` so the translator is a
//! lookup rather than a chain of comparisons.

use std::fmt;

use crate::decode::decode;

/// Errors returned by every client call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// HTTP 400, or a request that could not be built.
    #[error("invalid request{}", suffix(.0))]
    InvalidRequest(Option<String>),

    /// HTTP 401.
    #[error("unauthorized{}", suffix(.0))]
    Unauthorized(Option<String>),

    /// HTTP 403.
    #[error("forbidden{}", suffix(.0))]
    Forbidden(Option<String>),

    /// HTTP 404.
    #[error("not found{}", suffix(.0))]
    NotFound(Option<String>),

    /// HTTP 409.
    #[error("conflict{}", suffix(.0))]
    Conflict(Option<String>),

    /// Any other non-2xx status, including 502.
    #[error("request failed{}", suffix(.0))]
    Failure(Option<String>),

    /// HTTP 504, or a transport failure that outlived the retry budget.
    #[error("request timed out{}", suffix(.0))]
    Timeout(Option<String>),

    /// A success body that is not valid JSON.
    #[error("invalid response{}", suffix(.0))]
    InvalidResponse(Option<String>),
}

fn suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => String::new(),
    }
}

/// Fieldless tag for a `ClientError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Failure,
    Timeout,
    InvalidResponse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Failure => "Failure",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::InvalidResponse => "InvalidResponse",
        };
        f.write_str(name)
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ClientError::Unauthorized(_) => ErrorKind::Unauthorized,
            ClientError::Forbidden(_) => ErrorKind::Forbidden,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Conflict(_) => ErrorKind::Conflict,
            ClientError::Failure(_) => ErrorKind::Failure,
            ClientError::Timeout(_) => ErrorKind::Timeout,
            ClientError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ClientError::InvalidRequest(r)
            | ClientError::Unauthorized(r)
            | ClientError::Forbidden(r)
            | ClientError::NotFound(r)
            | ClientError::Conflict(r)
            | ClientError::Failure(r)
            | ClientError::Timeout(r)
            | ClientError::InvalidResponse(r) => r.as_deref(),
        }
    }
}

type Constructor = fn(Option<String>) -> ClientError;

/// Status codes with a dedicated kind. Anything absent maps to `Failure`.
const STATUS_TABLE: &[(u16, Constructor)] = &[
    (400, ClientError::InvalidRequest),
    (401, ClientError::Unauthorized),
    (403, ClientError::Forbidden),
    (404, ClientError::NotFound),
    (409, ClientError::Conflict),
    (502, ClientError::Failure),
    (504, ClientError::Timeout),
];

/// Map a non-2xx response onto a `ClientError`.
///
/// The reason is the `errorMessage` string of the decoded body when there is
/// one; otherwise a generic message naming the status. Never fails.
pub fn translate(status: u16, body: &str) -> ClientError {
    let reason = error_message(body)
        .unwrap_or_else(|| format!("request failed with status code {status}"));
    let constructor = match STATUS_TABLE.iter().find(|(code, _)| *code == status) {
        Some(&(_, constructor)) => constructor,
        None => ClientError::Failure,
    };
    constructor(Some(reason))
}

fn error_message(body: &str) -> Option<String> {
    let value = decode(body).ok()?;
    value.get("errorMessage")?.as_str().map(str::to_owned)
}
