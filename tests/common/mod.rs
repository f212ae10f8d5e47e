//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use marketboard::http_server::{HttpServer, ServerConfig, StorageBackend};
use serde_json::Value;
use tower::ServiceExt;

/// Router over JSON files in `dir`, with the classified session gate on
pub fn json_router(dir: &Path) -> Router {
    let mut config = ServerConfig::default();
    config.storage.backend = StorageBackend::Json;
    config.storage.data_dir = dir.to_path_buf();
    HttpServer::with_config(config)
        .expect("server should boot")
        .router()
}

/// Router over in-memory storage with the given gate setting
pub fn memory_router(protect_classified_create: bool) -> Router {
    let mut config = ServerConfig::in_memory();
    config.auth.protect_classified_create = protect_classified_create;
    HttpServer::with_config(config)
        .expect("server should boot")
        .router()
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "GET", uri, None, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "POST", uri, Some(body), None).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, "PUT", uri, Some(body), None).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, "DELETE", uri, None, None).await
}

/// Register `username` and return a session token
pub async fn login_as(router: &Router, username: &str) -> String {
    let credentials = serde_json::json!({"username": username, "password": "secret"});
    let (status, _) = post(router, "/api/register", credentials.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(router, "/api/login", credentials).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
