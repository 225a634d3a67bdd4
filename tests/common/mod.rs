//! Shared harness for gateway integration tests: an in-memory session behind
//! the real router, plus request builders for each accepted body encoding.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use confgate::api::auth::ApiKeyEntry;
use confgate::config::GatewayConfig;
use confgate::http_server::{build_router, ApiState};
use confgate::session::MemorySession;

pub const TEST_KEY: &str = "k1";

/// Router backed by an in-memory session, with one provisioned key
pub fn gateway(strict: bool) -> (Router, Arc<MemorySession>) {
    let session = Arc::new(MemorySession::new());
    let mut config = GatewayConfig::default();
    config.strict = strict;
    config.api_keys.push(ApiKeyEntry {
        id: "test".to_string(),
        key: TEST_KEY.to_string(),
    });
    let state = Arc::new(ApiState::new(config, session.clone()));
    (build_router(state), session)
}

pub async fn post_json(router: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, req).await
}

pub async fn post_multipart(
    router: Router,
    path: &str,
    fields: &[(&str, &str)],
) -> (StatusCode, Value) {
    let boundary = "------------------------confgate";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(router, req).await
}

pub async fn post_urlencoded(
    router: Router,
    path: &str,
    fields: &[(&str, &str)],
) -> (StatusCode, Value) {
    let body = fields
        .iter()
        .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(router, req).await
}

async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn percent_encode(s: &str) -> String {
    let mut out = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
