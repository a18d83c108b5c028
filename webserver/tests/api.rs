//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::http::StatusCode;
use serde_json::{json, Value};
use tokio_test::assert_ok;

mod common;
use common::{wait_for_condition, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_device_returns_inactive_device() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/devices",
            Some(json!({
                "name": "Front door",
                "device_type": "access_controller",
                "ip_address": "192.168.0.10",
                "metadata": { "building": "A" }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Front door");
    assert_eq!(body["device_type"], "access_controller");
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["metadata"]["building"], "A");
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn test_create_device_validation_errors() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/devices", Some(json!({ "name": "No type", "ip_address": "10.0.0.1" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("device_type"));

    let (status, _) = app
        .post(
            "/api/devices",
            Some(json!({ "name": "Thermal", "device_type": "thermal_camera", "ip_address": "10.0.0.1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/devices",
            Some(json!({ "name": "Bad ip", "device_type": "anpr", "ip_address": "300.1.1.1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreadable_body_is_bad_request_with_error() {
    let app = TestApp::new();

    let (status, body) = app.post_raw("/api/devices", Some("application/json"), "{ not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post_raw(
            "/api/devices",
            Some("application/json"),
            r#"{ "name": 5, "device_type": "anpr", "ip_address": "10.0.0.2" }"#,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post_raw(
            "/api/devices",
            None,
            r#"{ "name": "Cam", "device_type": "anpr", "ip_address": "10.0.0.3" }"#,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, devices) = app.get("/api/devices").await;
    assert_eq!(devices, Value::Array(vec![]));
}

#[tokio::test]
async fn test_duplicate_ip_is_conflict() {
    let app = TestApp::new();
    app.create_device("One", "anpr", "10.0.0.1").await;

    let (status, body) = app
        .post(
            "/api/devices",
            Some(json!({ "name": "Two", "device_type": "face_reader", "ip_address": "10.0.0.1" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let app = TestApp::new();
    let missing = uuid::Uuid::new_v4();

    let (status, body) = app.get(&format!("/api/devices/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = app.post("/api/devices/not-a-uuid/activate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post(&format!("/api/devices/{missing}/deactivate"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/devices/{missing}/history")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_activation_lifecycle_over_http() {
    let app = TestApp::new();
    let runner = app.start_manager();
    let id = app.create_device("Gate camera", "anpr", "10.0.1.1").await;

    // Activate
    let (status, body) = app.post(&format!("/api/devices/{id}/activate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["alreadyRunning"], false);
    assert_eq!(body["device"]["status"], "active");
    assert!(body["process"]["stopped_at"].is_null());

    // Second activation reuses the live process
    let (_, again) = app.post(&format!("/api/devices/{id}/activate"), None).await;
    assert_eq!(again["alreadyRunning"], true);
    assert_eq!(again["process"]["id"], body["process"]["id"]);

    // Listing shows the device live
    let (_, devices) = app.get("/api/devices").await;
    assert_eq!(devices[0]["id"], id.as_str());
    assert_eq!(devices[0]["live_active"], true);

    // Events reach the transaction log
    let uri = format!("/api/transactions?device_id={id}");
    let (app_ref, uri_ref) = (&app, uri.as_str());
    let has_events = wait_for_condition(
        || async move {
            let (_, rows) = app_ref.get(uri_ref).await;
            rows.as_array().map_or(false, |rows| !rows.is_empty())
        },
        3000,
    )
    .await;
    assert!(has_events, "no transactions recorded");
    let (_, rows) = app.get(&uri).await;
    let event_type = rows[0]["event_type"].as_str().unwrap();
    assert!(["plate_read", "plate_mismatch"].contains(&event_type));
    assert!(rows[0]["transaction_id"].is_string());

    // Deactivate
    let (status, body) = app.post(&format!("/api/devices/{id}/deactivate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "stopped": true }));

    let (_, device) = app.get(&format!("/api/devices/{id}")).await;
    assert_eq!(device["status"], "inactive");
    assert_eq!(device["live_active"], false);

    let (_, history) = app.get(&format!("/api/devices/{id}/history")).await;
    let reasons: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["reason"].as_str().unwrap())
        .collect();
    assert_eq!(reasons, vec!["user_activate", "user_deactivate"]);

    assert_ok!(app.manager.shutdown_sender().send(()).await);
    assert_ok!(runner.await);
}

#[tokio::test]
async fn test_deactivate_idle_device_reports_not_running() {
    let app = TestApp::new();
    let id = app.create_device("Idle", "face_reader", "10.0.2.1").await;

    let (status, body) = app.post(&format!("/api/devices/{id}/deactivate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "stopped": false, "reason": "not_running" }));

    let (_, history) = app.get(&format!("/api/devices/{id}/history")).await;
    assert_eq!(history, Value::Array(vec![]));
}

#[tokio::test]
async fn test_transactions_reject_malformed_filter() {
    let app = TestApp::new();

    let (status, rows) = app.get("/api/transactions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows, Value::Array(vec![]));

    let (status, body) = app.get("/api/transactions?device_id=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
