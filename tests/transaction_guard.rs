//! Configure transaction semantics over the full HTTP stack: auth ordering,
//! commit/discard behavior, and error classification.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{gateway, post_json, TEST_KEY};

#[tokio::test]
async fn single_set_commits_and_returns_empty_success() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router,
        "/configure",
        json!({
            "key": TEST_KEY,
            "op": "set",
            "path": ["interfaces", "eth0", "address"],
            "value": "192.0.2.1/24"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null, "error": null}));
    assert_eq!(
        session.calls(),
        vec![
            "set interfaces eth0 address 192.0.2.1/24".to_string(),
            "commit".to_string()
        ]
    );
}

#[tokio::test]
async fn unknown_op_cites_literal_string_and_mutates_nothing() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router,
        "/configure",
        json!({
            "key": TEST_KEY,
            "commands": [
                {"op": "set", "path": ["x"]},
                {"op": "frobnicate", "path": ["y"]}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"frobnicate\" is not a valid operation");
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn strict_delete_of_missing_path_discards_session() {
    let (router, session) = gateway(true);
    let (status, body) = post_json(
        router,
        "/configure",
        json!({
            "key": TEST_KEY,
            "op": "delete",
            "path": ["system", "ntp"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Cannot delete [system ntp]: path/value does not exist"
    );
    assert_eq!(session.calls(), vec!["discard".to_string()]);
}

#[tokio::test]
async fn strict_delete_of_existing_path_succeeds() {
    let (router, session) = gateway(true);
    session.seed(&["system", "ntp", "server", "192.0.2.10"]);
    let (status, _) = post_json(
        router,
        "/configure",
        json!({
            "key": TEST_KEY,
            "op": "delete",
            "path": ["system", "ntp"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        session.calls(),
        vec!["delete system ntp".to_string(), "commit".to_string()]
    );
}

#[tokio::test]
async fn commit_failure_reports_domain_message_and_discards() {
    let (router, session) = gateway(false);
    session.fail_next_commit("Commit failed: conflicting values");
    let (status, body) = post_json(
        router,
        "/configure",
        json!({"key": TEST_KEY, "op": "set", "path": ["x"]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Commit failed: conflicting values");
    assert_eq!(
        session.calls(),
        vec![
            "set x".to_string(),
            "commit".to_string(),
            "discard".to_string()
        ]
    );
}

#[tokio::test]
async fn unknown_key_is_rejected_regardless_of_payload_validity() {
    let (router, session) = gateway(false);
    // Payload is invalid too (missing path); auth must still win
    let (status, body) = post_json(
        router.clone(),
        "/configure",
        json!({"key": "wrong", "op": "set"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"success": false, "data": null, "error": "Valid API key is required"})
    );

    let (status, body) = post_json(router, "/configure", json!({"op": "set", "path": ["x"]})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Valid API key is required");
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn ordered_batch_executes_in_submitted_sequence() {
    let (router, session) = gateway(false);
    let (status, _) = post_json(
        router,
        "/configure",
        json!({
            "key": TEST_KEY,
            "commands": [
                {"op": "set", "path": ["a"], "value": "1"},
                {"op": "comment", "path": ["a"], "value": "note"},
                {"op": "delete", "path": ["b"]}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        session.calls(),
        vec![
            "set a 1".to_string(),
            "comment a note".to_string(),
            "delete b".to_string(),
            "commit".to_string()
        ]
    );
}
