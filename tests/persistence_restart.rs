//! Persistence Restart Tests
//!
//! Every accepted write is on disk before the response goes out, so a
//! fresh server over the same directory sees the same records and keeps
//! allocating ids above them.

mod common;

use std::fs;
use std::sync::Arc;

use axum::http::StatusCode;
use common::{delete, get, json_router, login_as, post, put};
use marketboard::http_server::{HttpServer, ServerConfig, StorageBackend};
use marketboard::store::{CorruptPolicy, Persistence, StoreError, StoreResult};
use serde_json::{json, Value};
use tempfile::TempDir;

fn company(name: &str) -> Value {
    json!({"name": name, "category": "Tech", "description": "Tools"})
}

#[tokio::test]
async fn test_records_and_counter_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let router = json_router(temp_dir.path());
        for name in ["Acme", "Globex", "Initech"] {
            let (status, _) = post(&router, "/api/companies", company(name)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
    }

    let router = json_router(temp_dir.path());
    let (_, body) = get(&router, "/api/companies").await;
    let names: Vec<_> = body["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Acme", "Globex", "Initech"]);

    let (_, body) = post(&router, "/api/companies", company("Umbrella")).await;
    assert_eq!(body["company"]["id"], 4);
}

#[tokio::test]
async fn test_deleted_ids_stay_retired_across_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let router = json_router(temp_dir.path());
        post(&router, "/api/companies", company("Acme")).await;
        post(&router, "/api/companies", company("Globex")).await;
        let (status, _) = delete(&router, "/api/companies/2").await;
        assert_eq!(status, StatusCode::OK);
    }

    let router = json_router(temp_dir.path());
    let (_, body) = post(&router, "/api/companies", company("Initech")).await;
    assert_eq!(body["company"]["id"], 3);
}

#[tokio::test]
async fn test_updates_are_persisted() {
    let temp_dir = TempDir::new().unwrap();

    {
        let router = json_router(temp_dir.path());
        post(
            &router,
            "/api/vacancies",
            json!({"title": "Dev", "company": "Acme", "description": "Role", "salary": 4000}),
        )
        .await;
        put(&router, "/api/vacancies/1", json!({"salary": 4500})).await;
    }

    let on_disk: Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join("vacancies.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk["nextId"], 2);
    assert_eq!(on_disk["items"][0]["salary"].as_f64(), Some(4500.0));

    let router = json_router(temp_dir.path());
    let (_, body) = get(&router, "/api/vacancies/1").await;
    assert_eq!(body["vacancy"]["salary"].as_f64(), Some(4500.0));
}

#[tokio::test]
async fn test_users_survive_restart_but_sessions_do_not() {
    let temp_dir = TempDir::new().unwrap();
    let token = {
        let router = json_router(temp_dir.path());
        login_as(&router, "alice").await
    };

    let router = json_router(temp_dir.path());
    let (status, _) = post(
        &router,
        "/api/login",
        json!({"username": "alice", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(
        &router,
        "POST",
        "/api/classifieds",
        Some(json!({"title": "Bike", "description": "Red", "category": "Sports"})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_corrupt_file_is_quarantined_under_warn_policy() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("companies.json"), "{not json").unwrap();

    let mut config = ServerConfig::default();
    config.storage.backend = StorageBackend::Json;
    config.storage.data_dir = temp_dir.path().to_path_buf();
    config.storage.on_corrupt = CorruptPolicy::Warn;

    HttpServer::with_config(config).unwrap();

    assert!(!temp_dir.path().join("companies.json").exists());
    let quarantined = fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .any(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("companies.json.corrupt-")
        });
    assert!(quarantined, "corrupt file should be set aside, not deleted");
}

#[test]
fn test_corrupt_file_refuses_startup_under_fail_policy() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("companies.json"), "{not json").unwrap();

    let mut config = ServerConfig::default();
    config.storage.backend = StorageBackend::Json;
    config.storage.data_dir = temp_dir.path().to_path_buf();
    config.storage.on_corrupt = CorruptPolicy::Fail;

    assert!(HttpServer::with_config(config).is_err());
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("companies.json")).unwrap(),
        "{not json"
    );
}

/// Disk that accepts reads but rejects every write
#[derive(Debug)]
struct FullDisk;

impl Persistence for FullDisk {
    fn load(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn save(&self, key: &str, _contents: &str) -> StoreResult<()> {
        Err(StoreError::io(key, "no space left on device"))
    }

    fn quarantine(&self, key: &str) -> StoreResult<String> {
        Err(StoreError::io(key, "no space left on device"))
    }
}

#[tokio::test]
async fn test_failed_write_is_500_and_leaves_no_record() {
    let router = HttpServer::with_persistence(ServerConfig::in_memory(), Arc::new(FullDisk))
        .unwrap()
        .router();

    let (status, body) = post(&router, "/api/companies", company("Acme")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Internal server error"}));

    let (_, body) = get(&router, "/api/companies").await;
    assert!(body["companies"].as_array().unwrap().is_empty());

    let (status, _) = get(&router, "/api/companies/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
