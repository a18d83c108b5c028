//! Test helper utilities for webserver API tests

#![allow(dead_code)]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use manager::{DeviceService, InMemoryProcessManager, ManagerConfig, SystemClock};
use webserver::{build_router, AppState};
use worker::WorkerConfig;

/// Manager with millisecond workers plus a router over it
pub struct TestApp {
    pub router: Router,
    pub manager: Arc<InMemoryProcessManager>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = ManagerConfig::new().with_worker(
            WorkerConfig::new()
                .with_interval(Duration::from_millis(5), Duration::from_millis(15))
                .with_seed(Some(21)),
        );
        let manager = Arc::new(
            InMemoryProcessManager::in_memory(config, Arc::new(SystemClock)).expect("valid test config"),
        );
        let router = build_router(AppState::new(DeviceService::new(manager.clone())));
        Self { router, manager }
    }

    /// Spawn the manager run loop so worker events are ingested
    pub fn start_manager(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.manager.clone();
        tokio::spawn(async move {
            let _ = manager.run().await;
        })
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("valid request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("readable body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// POST a raw body, optionally without a content type
    pub async fn post_raw(&self, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::POST, uri, body).await
    }

    /// Register a device and return its id
    pub async fn create_device(&self, name: &str, device_type: &str, ip: &str) -> String {
        let (status, body) = self
            .post(
                "/api/devices",
                Some(serde_json::json!({ "name": name, "device_type": device_type, "ip_address": ip })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body {body}");
        body["id"].as_str().expect("device id").to_string()
    }
}

/// Poll `condition` every 10ms until it holds or `timeout_ms` passes
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
