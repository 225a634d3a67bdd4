//! Per-route field validation and op dispatch for the read-only and
//! image/file operation families.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{gateway, post_json, TEST_KEY};

#[tokio::test]
async fn retrieve_exists_reflects_active_configuration() {
    let (router, session) = gateway(false);
    session.seed(&["service", "ssh", "port", "22"]);

    let (status, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "exists", "path": ["service", "ssh"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (_, body) = post_json(
        router,
        "/retrieve",
        json!({"key": TEST_KEY, "op": "exists", "path": ["service", "dns"]}),
    )
    .await;
    assert_eq!(body["data"], false);
}

#[tokio::test]
async fn retrieve_return_value_and_values() {
    let (router, session) = gateway(false);
    session.seed(&["system", "name-server", "192.0.2.53"]);
    session.seed(&["system", "name-server", "192.0.2.54"]);

    let (_, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "returnValue", "path": ["system", "name-server"]}),
    )
    .await;
    assert_eq!(body["data"], "192.0.2.53");

    let (_, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "returnValues", "path": ["system", "name-server"]}),
    )
    .await;
    assert_eq!(body["data"], json!(["192.0.2.53", "192.0.2.54"]));

    let (_, body) = post_json(
        router,
        "/retrieve",
        json!({"key": TEST_KEY, "op": "returnValue", "path": ["system", "ntp"]}),
    )
    .await;
    assert_eq!(body["data"], serde_json::Value::Null);
}

#[tokio::test]
async fn retrieve_show_config_formats() {
    let (router, session) = gateway(false);
    session.seed(&["interfaces", "eth0", "address", "192.0.2.1/24"]);

    let (_, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "showConfig", "path": [], "configFormat": "raw"}),
    )
    .await;
    assert_eq!(body["data"], "interfaces eth0 address 192.0.2.1/24");

    // json is the default format
    let (_, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "showConfig", "path": []}),
    )
    .await;
    assert!(body["data"]["interfaces"]["eth0"]["address"].is_object());

    let (status, body) = post_json(
        router,
        "/retrieve",
        json!({"key": TEST_KEY, "op": "showConfig", "path": [], "configFormat": "yaml"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"yaml\" is not a valid config format");
}

#[tokio::test]
async fn retrieve_requires_op_and_path() {
    let (router, _) = gateway(false);
    let (status, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "path": ["x"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field \"op\"");

    let (status, body) = post_json(
        router.clone(),
        "/retrieve",
        json!({"key": TEST_KEY, "op": "exists"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field \"path\"");

    let (status, body) = post_json(
        router,
        "/retrieve",
        json!({"key": TEST_KEY, "op": "describe", "path": ["x"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"describe\" is not a valid operation");
}

#[tokio::test]
async fn config_file_save_defaults_to_boot_config() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router,
        "/config-file",
        json!({"key": TEST_KEY, "op": "save"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "Saving configuration to '/config/config.boot'");
    assert_eq!(session.calls(), vec!["save /config/config.boot".to_string()]);
}

#[tokio::test]
async fn config_file_load_requires_file() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router.clone(),
        "/config-file",
        json!({"key": TEST_KEY, "op": "load"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field \"file\"");
    assert!(session.calls().is_empty());

    let (status, _) = post_json(
        router,
        "/config-file",
        json!({"key": TEST_KEY, "op": "load", "file": "/tmp/alt.boot"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session.calls(), vec!["load /tmp/alt.boot".to_string()]);
}

#[tokio::test]
async fn image_add_requires_url() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router.clone(),
        "/image",
        json!({"key": TEST_KEY, "op": "add"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field \"url\"");

    let (status, _) = post_json(
        router,
        "/image",
        json!({"key": TEST_KEY, "op": "add", "url": "https://images.example/router.iso"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        session.calls(),
        vec!["install-image https://images.example/router.iso".to_string()]
    );
}

#[tokio::test]
async fn image_delete_requires_name() {
    let (router, session) = gateway(false);
    let (status, body) = post_json(
        router.clone(),
        "/image",
        json!({"key": TEST_KEY, "op": "delete"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field \"name\"");

    let (status, _) = post_json(
        router,
        "/image",
        json!({"key": TEST_KEY, "op": "delete", "name": "1.4-rolling"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session.calls(), vec!["remove-image 1.4-rolling".to_string()]);
}

#[tokio::test]
async fn container_image_ops() {
    let (router, session) = gateway(false);
    let (status, _) = post_json(
        router.clone(),
        "/container-image",
        json!({"key": TEST_KEY, "op": "add", "name": "alpine:3.20"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        router.clone(),
        "/container-image",
        json!({"key": TEST_KEY, "op": "show"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "REPOSITORY  TAG  IMAGE ID");

    let (status, body) = post_json(
        router,
        "/container-image",
        json!({"key": TEST_KEY, "op": "prune"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"prune\" is not a valid operation");

    assert_eq!(
        session.calls(),
        vec!["add-container-image alpine:3.20".to_string()]
    );
}

#[tokio::test]
async fn op_mode_routes_accept_only_their_own_op() {
    let (router, _) = gateway(false);
    let (status, body) = post_json(
        router.clone(),
        "/show",
        json!({"key": TEST_KEY, "op": "show", "path": ["interfaces"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "show interfaces");

    let (status, body) = post_json(
        router.clone(),
        "/show",
        json!({"key": TEST_KEY, "op": "generate", "path": ["interfaces"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "\"generate\" is not a valid operation");

    let (status, body) = post_json(
        router.clone(),
        "/generate",
        json!({"key": TEST_KEY, "op": "generate", "path": ["pki", "wireguard", "key-pair"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "generated pki wireguard key-pair");

    let (status, _) = post_json(
        router,
        "/reset",
        json!({"key": TEST_KEY, "op": "reset", "path": ["conntrack"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn read_routes_reject_unknown_keys_too() {
    let (router, _) = gateway(false);
    for path in ["/retrieve", "/config-file", "/image", "/container-image", "/show"] {
        let (status, body) = post_json(
            router.clone(),
            path,
            json!({"key": "wrong", "op": "show", "path": []}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "route {path}");
        assert_eq!(body["error"], "Valid API key is required", "route {path}");
    }
}
