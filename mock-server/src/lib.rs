use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

pub type Fields = BTreeMap<String, String>;

/// Query parameters for `/status/{code}`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    /// Sent back as `{"errorMessage": ...}`.
    pub message: Option<String>,
    /// Sent back verbatim when `message` is absent.
    pub raw: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawParams {
    #[serde(default)]
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo_query).post(echo_body).put(echo_body))
        .route("/echo/form", post(echo_form).put(echo_form))
        .route("/headers", get(echo_headers))
        .route("/status/{code}", any(status))
        .route("/raw", get(raw))
        .route("/empty", get(empty))
        .route("/slow/{ms}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!(addr = ?listener.local_addr().ok(), "mock server listening");
    axum::serve(listener, app()).await
}

async fn echo_query(Query(params): Query<Fields>) -> Json<Fields> {
    Json(params)
}

async fn echo_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn echo_form(Form(fields): Form<Fields>) -> Json<Fields> {
    Json(fields)
}

async fn echo_headers(headers: HeaderMap) -> Json<Fields> {
    Json(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
    )
}

async fn status(Path(code): Path<u16>, Query(params): Query<StatusParams>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    tracing::debug!(%status, "scripted status");
    match (params.message, params.raw) {
        (Some(message), _) => (status, Json(json!({ "errorMessage": message }))).into_response(),
        (None, Some(raw)) => (status, raw).into_response(),
        (None, None) => status.into_response(),
    }
}

async fn raw(Query(params): Query<RawParams>) -> (StatusCode, String) {
    (StatusCode::OK, params.body)
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn slow(Path(ms): Path<u64>) -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_params_are_optional() {
        let params: StatusParams = serde_json::from_str("{}").unwrap();
        assert!(params.message.is_none());
        assert!(params.raw.is_none());
    }

    #[test]
    fn raw_params_default_to_empty_body() {
        let params: RawParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.body, "");
    }
}
