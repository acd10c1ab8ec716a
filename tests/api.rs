//! Router-level tests of the configuration API, driven in-process.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use telegram_relay::workers::{BATTERY_MONITOR, CHAT_COMMAND};

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn post_config(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/config")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len().to_string())
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_config_returns_documented_defaults() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/api/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let config = body_json(response).await;
    assert_eq!(
        config,
        json!({
            "botToken": "",
            "chatId": "",
            "trustedNumber": "",
            "chatCommand": false,
            "batteryMonitoring": false,
            "chargerStatus": false,
            "fallbackSms": false,
            "verificationCode": true,
            "privacyMode": false,
            "dohSwitch": false,
        })
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn post_then_get_roundtrip() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let body = json!({
        "botToken": "123:abc",
        "chatId": "-42",
        "batteryMonitoring": true,
    })
    .to_string();
    let response = router.clone().oneshot(post_config(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(
        saved["message"],
        "Configuration saved successfully! Services restarting..."
    );

    let response = router.oneshot(get("/api/config")).await.unwrap();
    let config = body_json(response).await;
    assert_eq!(config["botToken"], "123:abc");
    assert_eq!(config["chatId"], "-42");
    assert_eq!(config["batteryMonitoring"], true);
    // Absent booleans save as false, including verificationCode.
    assert_eq!(config["verificationCode"], false);
    assert_eq!(config["chatCommand"], false);
    assert_eq!(config["trustedNumber"], "");
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn initialized_flips_on_first_save_and_stays() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.clone().oneshot(get("/api/info")).await.unwrap();
    assert_eq!(body_json(response).await["serviceRunning"], false);

    let body = json!({ "botToken": "t" }).to_string();
    router.clone().oneshot(post_config(&body)).await.unwrap();

    for _ in 0..2 {
        let response = router.clone().oneshot(get("/api/info")).await.unwrap();
        assert_eq!(body_json(response).await["serviceRunning"], true);
    }
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn post_without_content_length_is_rejected() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/config")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing content-length header" })
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn post_with_short_body_reports_exact_counts() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let body = r#"{"botToken":"t"}"#;
    let request = Request::builder()
        .method("POST")
        .uri("/api/config")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, (body.len() + 9).to_string())
        .body(Body::from(body))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        format!(
            "Incomplete request body: expected {} bytes, got {}",
            body.len() + 9,
            body.len()
        )
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn post_with_unparseable_body_is_a_save_failure() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router
        .clone()
        .oneshot(post_config("this is not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await["error"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(error.starts_with("Failed to save configuration: "), "{error}");

    // The failed save must not have initialized the store.
    let response = router.oneshot(get("/api/info")).await.unwrap();
    assert_eq!(body_json(response).await["serviceRunning"], false);
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn wrong_typed_fields_coerce_instead_of_failing() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let body = json!({
        "botToken": "t",
        "chatCommand": "true",
        "batteryMonitoring": 1,
    })
    .to_string();
    let response = router.clone().oneshot(post_config(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get("/api/config")).await.unwrap();
    let config = body_json(response).await;
    assert_eq!(config["chatCommand"], false);
    assert_eq!(config["batteryMonitoring"], false);
    assert_eq!(config["botToken"], "t");
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn info_reports_versions_and_bounded_battery() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/api/info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let info = body_json(response).await;
    assert!(info["androidVersion"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(info["appVersion"], env!("CARGO_PKG_VERSION"));
    match &info["batteryLevel"] {
        Value::Null => {} // hosts without a battery omit the field
        Value::Number(n) => {
            let level = n.as_u64().unwrap();
            assert!(level <= 100);
        }
        other => panic!("unexpected batteryLevel: {other:?}"),
    }
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_endpoint_is_a_stub() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/api/test")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Connection test not implemented yet" })
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn unknown_api_path_is_json_404() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/api/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "API endpoint not found" })
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn unknown_path_is_plain_404() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/foo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );
    assert_eq!(body_text(response).await, "404 Not Found");
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn index_is_served_at_both_roots() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    for path in ["/", "/index.html"] {
        let response = router.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
    }

    let response = router.oneshot(get("/style.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn extension_rules_rank_above_the_api_prefix() {
    let (state, dir) = common::test_state();
    let router = common::test_router(state);

    let response = router.oneshot(get("/api/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );
    assert_eq!(body_text(response).await, "File not found");
    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn save_restarts_workers_to_match_flags() {
    let (state, dir) = common::test_state();
    let supervisor = state.supervisor.clone();
    let router = common::test_router(state);

    let body = json!({ "batteryMonitoring": true, "chatCommand": false }).to_string();
    let response = router.clone().oneshot(post_config(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The restart is asynchronous; give it the settle interval plus slack.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(supervisor.is_running(BATTERY_MONITOR));
    assert!(!supervisor.is_running(CHAT_COMMAND));

    // Saving the same flags again neither errors nor duplicates workers.
    let response = router.oneshot(post_config(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(supervisor.is_running(BATTERY_MONITOR));
    assert!(!supervisor.is_running(CHAT_COMMAND));
    std::fs::remove_dir_all(dir).ok();
}
