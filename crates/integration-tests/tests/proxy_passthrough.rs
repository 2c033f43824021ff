//! Integration tests for the affiliate proxy routes.
//!
//! These tests verify that `/api/send-otp` and `/api/register` forward
//! the upstream status and body verbatim, inject the configured
//! `Origin`/`Referer` headers, and degrade to the fixed error envelope
//! when the upstream is unreachable.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use spinline_integration_tests::test_config;
use spinline_signup::routes;
use spinline_signup::state::AppState;

/// Build the service router against the given affiliate base URL.
fn app(base: &str) -> axum::Router {
    let config = test_config(base, "https://brand.test/username-check.php");
    let state = AppState::new(config).expect("state builds from test config");
    routes::routes().with_state(state)
}

/// POST a JSON body to a proxy route and return (status, body bytes).
async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_send_otp_passes_success_through_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/user/send-otp")
        .match_header("origin", "https://brand.test")
        .match_header("referer", "https://brand.test/")
        .match_body(mockito::Matcher::PartialJson(
            json!({"registerInfo": "deadbeef"}),
        ))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(&server.url()),
        "/api/send-otp",
        json!({"registerInfo": "deadbeef"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], br#"{"success":true}"#);
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_send_otp_passes_error_status_through_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/user/send-otp")
        .with_status(400)
        .with_body(r#"{"success":false,"message":"Mobile already registered"}"#)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(&server.url()),
        "/api/send-otp",
        json!({"registerInfo": "deadbeef"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        &body[..],
        br#"{"success":false,"message":"Mobile already registered"}"#
    );
}

#[tokio::test]
async fn test_register_passes_token_through() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/user/user-register")
        .match_header("origin", "https://brand.test")
        .with_status(200)
        .with_body(r#"{"success":true,"token":"abc"}"#)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(&server.url()),
        "/api/register",
        json!({"registerInfo": "cafebabe"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(parsed["success"], json!(true));
    assert_eq!(parsed["token"], json!("abc"));
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_upstream_returns_proxy_error_envelope() {
    // Nothing listens on port 9 (discard); connection is refused locally.
    let (status, body) = post_json(
        app("http://127.0.0.1:9"),
        "/api/send-otp",
        json!({"registerInfo": "deadbeef"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let parsed: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(parsed["success"], json!(false));
    assert_eq!(parsed["error"], json!("Network Proxy Error"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/user/send-otp")
        .expect(0)
        .create_async()
        .await;

    let (status, _body) = post_json(
        app(&server.url()),
        "/api/send-otp",
        json!({"wrongField": true}),
    )
    .await;

    assert!(status.is_client_error());
    upstream.assert_async().await;
}
