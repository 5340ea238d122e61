//! Per-client configuration.
//!
//! Defaults are applied once when the config is built (or deserialized);
//! calls only ever read it.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest delay inserted between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// How POST/PUT bodies are put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// `application/json`; any JSON value.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`; flat objects only.
    Form,
}

impl BodyEncoding {
    pub fn content_type(self) -> &'static str {
        match self {
            BodyEncoding::Json => "application/json",
            BodyEncoding::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// Configuration owned by one `Client`.
///
/// A timeout of zero disables that deadline and leaves the transport's own
/// defaults in charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_uri: String,
    pub user_agent: String,
    /// Deadline for connecting and writing the request.
    pub request_timeout_ms: u64,
    /// Deadline for the whole attempt, response included.
    pub response_timeout_ms: u64,
    /// Extra attempts after a transport failure.
    pub retry_count: u32,
    /// Base delay before a retry, doubled per attempt. Zero retries at once.
    pub retry_backoff_ms: u64,
    pub body_encoding: BodyEncoding,
    /// Headers sent with every request.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: String::new(),
            user_agent: format!("restwrap/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_ms: 30_000,
            response_timeout_ms: 30_000,
            retry_count: 2,
            retry_backoff_ms: 0,
            body_encoding: BodyEncoding::Json,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        non_zero(self.request_timeout_ms)
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        non_zero(self.response_timeout_ms)
    }

    /// Wall-clock bound on a single attempt.
    pub fn attempt_deadline(&self) -> Option<Duration> {
        self.response_timeout().or_else(|| self.request_timeout())
    }

    /// Delay before retry number `attempt` (0-based), if any.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        if self.retry_backoff_ms == 0 {
            return None;
        }
        let ms = self
            .retry_backoff_ms
            .checked_shl(attempt)
            .filter(|ms| *ms >> attempt == self.retry_backoff_ms)
            .unwrap_or(u64::MAX);
        Some(Duration::from_millis(ms).min(MAX_BACKOFF))
    }
}

fn non_zero(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
