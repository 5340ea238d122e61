use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Fields};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn request(method: &str, uri: &str, content_type: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, content_type)
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_returns_query_as_object() {
    let resp = app().oneshot(get("/echo?a=1&b=two%20words")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: Fields = body_json(resp).await;
    assert_eq!(fields.get("a").map(String::as_str), Some("1"));
    assert_eq!(fields.get("b").map(String::as_str), Some("two words"));
}

#[tokio::test]
async fn echo_returns_body_verbatim() {
    let body = r#"{"nested":{"list":[1,2,3]}}"#;
    let resp = app()
        .oneshot(request("POST", "/echo", "application/json", body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(resp).await, body.as_bytes());
}

#[tokio::test]
async fn echo_form_returns_fields() {
    let resp = app()
        .oneshot(request(
            "PUT",
            "/echo/form",
            "application/x-www-form-urlencoded",
            "name=a+b&n=3",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fields: Fields = body_json(resp).await;
    assert_eq!(fields.get("name").map(String::as_str), Some("a b"));
    assert_eq!(fields.get("n").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn headers_are_reported() {
    let req = Request::builder()
        .uri("/headers")
        .header("user-agent", "api-test/1")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    let fields: Fields = body_json(resp).await;
    assert_eq!(fields.get("user-agent").map(String::as_str), Some("api-test/1"));
}

// --- scripted statuses ---

#[tokio::test]
async fn status_with_message() {
    let resp = app().oneshot(get("/status/404?message=gone")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["errorMessage"], "gone");
}

#[tokio::test]
async fn status_with_raw_body() {
    let resp = app()
        .oneshot(request("POST", "/status/409?raw=nope", "application/json", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_bytes(resp).await, "nope".as_bytes());
}

#[tokio::test]
async fn status_without_body() {
    let resp = app().oneshot(get("/status/502")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn out_of_range_status_is_rejected() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- raw / empty / slow ---

#[tokio::test]
async fn raw_returns_text() {
    let resp = app().oneshot(get("/raw?body=abc")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "abc".as_bytes());
}

#[tokio::test]
async fn empty_returns_204() {
    let resp = app().oneshot(get("/empty")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn slow_eventually_answers() {
    let resp = app().oneshot(get("/slow/5")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({}));
}
