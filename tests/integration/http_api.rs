use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;
use vizdata::server::{build_router, ServerSettings};
use vizdata::tree::WalkerConfig;

fn settings(data_dir: &Path) -> ServerSettings {
    ServerSettings {
        data_dir: data_dir.to_path_buf(),
        walker: WalkerConfig::default(),
        host: "127.0.0.1".to_string(),
        port: 0,
        structure_endpoint: "data-structure".to_string(),
        data_mount: "data".to_string(),
        cors: true,
    }
}

fn seeded_data_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let region = temp.path().join("region");
    fs::create_dir_all(&region).unwrap();
    fs::write(temp.path().join("index.json"), r#"{"title":"Index"}"#).unwrap();
    fs::write(region.join("north.json"), "[1,2,3]").unwrap();
    temp
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

#[tokio::test]
async fn structure_endpoint_returns_flat_tree() {
    let data = seeded_data_dir();
    let app = build_router(&settings(data.path()));

    let response = app.oneshot(get("/api/data-structure")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({
            "region": { "files": ["north.json"] },
            "files": ["index.json"]
        })
    );
}

#[tokio::test]
async fn structure_endpoint_supports_tagged_format() {
    let data = seeded_data_dir();
    let app = build_router(&settings(data.path()));

    let response = app
        .oneshot(get("/api/data-structure?format=tagged"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["files"], json!(["index.json"]));
    assert_eq!(body["children"]["region"]["files"], json!(["north.json"]));
}

#[tokio::test]
async fn missing_data_dir_yields_empty_object() {
    let temp = TempDir::new().unwrap();
    let app = build_router(&settings(&temp.path().join("not-there")));

    let response = app.oneshot(get("/api/data-structure")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await, json!({}));
}

#[tokio::test]
async fn custom_structure_endpoint_is_routed() {
    let data = seeded_data_dir();
    let mut settings = settings(data.path());
    settings.structure_endpoint = "toc".to_string();
    let app = build_router(&settings);

    let response = app.clone().oneshot(get("/api/toc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/data-structure")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_mount_serves_data_files() {
    let data = seeded_data_dir();
    let app = build_router(&settings(data.path()));

    let response = app.oneshot(get("/data/region/north.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    assert_eq!(body_bytes(response.into_body()).await, b"[1,2,3]".to_vec());
}

#[tokio::test]
async fn static_mount_returns_404_for_missing_file() {
    let data = seeded_data_dir();
    let app = build_router(&settings(data.path()));

    let response = app.oneshot(get("/data/nope.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let data = seeded_data_dir();
    let app = build_router(&settings(data.path()));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "vizdata");
    assert!(body["version"].is_string());
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_subdirectory_yields_500_with_error_message() {
    use std::os::unix::fs::PermissionsExt;

    let data = seeded_data_dir();
    let locked = data.path().join("locked");
    fs::create_dir_all(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop root
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let app = build_router(&settings(data.path()));
    let response = app.oneshot(get("/api/data-structure")).await.unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().is_some_and(|msg| msg.contains("locked")));
}
