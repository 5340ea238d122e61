//! Client facade over the request executor.
//!
//! # Design
//! `Client` pairs a read-only `ClientConfig` with a `Transport` and carries
//! no other state, so one client can serve any number of concurrent calls.
//! Each verb builds a fresh `RequestSpec` and hands it to `execute`.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::executor::execute;
use crate::http::Transport;
use crate::types::{Query, RequestSpec};

#[cfg(feature = "reqwest")]
use crate::reqwest_transport::ReqwestTransport;

/// JSON-over-HTTP client.
///
/// Bodies are sent as `application/json` unless the config selects
/// `BodyEncoding::Form`, in which case they must be flat objects and are
/// sent as `application/x-www-form-urlencoded`. Responses are always decoded
/// as JSON.
#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
    /// Client using the reqwest transport configured from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(&self, path: &str, query: Option<Query>) -> Result<Value, ClientError> {
        self.execute(RequestSpec::get(path, query)).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError> {
        self.execute(RequestSpec::post(path, body)).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<Value, ClientError> {
        self.execute(RequestSpec::put(path, body)).await
    }

    /// POST any serializable body.
    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        self.post(path, Some(to_value(body)?)).await
    }

    /// PUT any serializable body.
    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        self.put(path, Some(to_value(body)?)).await
    }

    pub async fn execute(&self, spec: RequestSpec) -> Result<Value, ClientError> {
        execute(&self.config, &self.transport, &spec).await
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::InvalidRequest(Some(e.to_string())))
}
