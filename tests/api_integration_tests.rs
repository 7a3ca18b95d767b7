//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an
//! in-process extractor.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use video_cache::{
    api::create_router,
    cache::{CacheSettings, Registry},
    models::VideoRecord,
    video::testing::FakeExtractor,
    AppState,
};

// == Helper Functions ==

struct TestApp {
    router: Router,
    registry: Arc<Registry<VideoRecord>>,
    extractor: Arc<FakeExtractor>,
    _dir: TempDir,
}

fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let registry = Arc::new(Registry::new(CacheSettings {
        default_ttl: Some(3600),
        sweep_interval: None,
    }));
    let extractor = Arc::new(FakeExtractor::new());
    let state = AppState::new(registry.clone(), extractor.clone(), dir.path());

    TestApp {
        router: create_router(state),
        registry,
        extractor,
        _dir: dir,
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));

    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == Extract / Info ==

#[tokio::test]
async fn test_extract_then_info() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "GET",
        "/api/extract?url=https%3A%2F%2Fexample.com%2Fwatch%2Fvid1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["video_id"], "vid1");
    assert_eq!(json["platform"], "fake");
    assert_eq!(json["title"], "Video vid1");
    let hash = json["video_hash"].as_str().unwrap().to_string();

    let response = send(&app.router, "GET", &format!("/api/info/{}", hash), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cached = body_to_json(response.into_body()).await;
    assert_eq!(cached, json);

    let record = app.registry.get_default().unwrap().get(&hash).unwrap();
    assert!(record.output_path.is_none());
}

#[tokio::test]
async fn test_extract_invalid_url() {
    let app = create_test_app();

    let response = send(&app.router, "GET", "/api/extract?url=notaurl", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.extractor.extract_calls(), 0);
}

#[tokio::test]
async fn test_extract_failure_is_bad_request() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "GET",
        "/api/extract?url=https%3A%2F%2Fexample.com%2Fmissing%2Fx",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Failed to extract info"));
}

// == Download ==

#[tokio::test]
async fn test_download_returns_file_and_updates_record() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "GET",
        "/api/download?url=https%3A%2F%2Fexample.com%2Fwatch%2Fdl1",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "video/mp4");
    let hash = response.headers()["x-video-hash"].to_str().unwrap().to_string();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"media for https://example.com/watch/dl1");

    let record = app.registry.get_default().unwrap().get(&hash).unwrap();
    assert!(record.artifact().is_some());
    assert_eq!(record.download_options.unwrap().file_format, "mp4");
}

#[tokio::test]
async fn test_download_by_hash_reuses_artifact() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "GET",
        "/api/download?url=https%3A%2F%2Fexample.com%2Fwatch%2Fdl2",
        None,
    )
    .await;
    let hash = response.headers()["x-video-hash"].to_str().unwrap().to_string();

    let response = send(&app.router, "GET", &format!("/api/download/{}", hash), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.extractor.download_calls(), 1);
}

#[tokio::test]
async fn test_download_by_hash_not_found() {
    let app = create_test_app();

    let response = send(&app.router, "GET", "/api/download/0123456789abcdef", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advanced_download_headers() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "POST",
        "/api/download/advanced",
        Some(r#"{"url":"https://example.com/watch/adv","quality":"high","file_format":"mkv"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-quality"], "high");
    assert_eq!(response.headers()["x-format"], "mkv");
    assert_eq!(response.headers()["content-type"], "application/octet-stream");
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .contains(".mkv"));
}

#[tokio::test]
async fn test_advanced_download_rejects_bad_options() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "POST",
        "/api/download/advanced",
        Some(r#"{"url":"https://example.com/watch/adv","file_format":"avi"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.extractor.download_calls(), 0);
}

// == Cache Status / Delete ==

#[tokio::test]
async fn test_cache_status_lists_entries() {
    let app = create_test_app();

    for id in ["s1", "s2"] {
        let uri = format!("/api/extract?url=https%3A%2F%2Fexample.com%2Fwatch%2F{}", id);
        assert_eq!(send(&app.router, "GET", &uri, None).await.status(), StatusCode::OK);
    }

    let response = send(&app.router, "GET", "/api/cache", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 2);
    let videos = json["cached_videos"].as_array().unwrap();
    assert!(videos.iter().all(|v| v["expires_in_seconds"].as_u64().unwrap() > 3500));
    assert!(videos.iter().all(|v| v["downloaded"] == false));
}

#[tokio::test]
async fn test_delete_cache_entry() {
    let app = create_test_app();

    let response = send(
        &app.router,
        "GET",
        "/api/extract?url=https%3A%2F%2Fexample.com%2Fwatch%2Fgone",
        None,
    )
    .await;
    let hash = body_to_json(response.into_body()).await["video_hash"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send(&app.router, "DELETE", &format!("/api/cache/{}", hash), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], format!("Cache cleared for hash: {}", hash));

    let response = send(&app.router, "DELETE", &format!("/api/cache/{}", hash), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app.router, "GET", &format!("/api/info/{}", hash), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_follow_default_cache() {
    let app = create_test_app();
    let alt = app.registry.create("alt", "in-memory").unwrap();
    app.registry.set_default("alt").unwrap();

    let response = send(
        &app.router,
        "GET",
        "/api/extract?url=https%3A%2F%2Fexample.com%2Fwatch%2Fsw",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(alt.size(), 1);
    assert_eq!(app.registry.get("default").unwrap().size(), 0);
}

#[tokio::test]
async fn test_torn_down_registry_is_server_error() {
    let app = create_test_app();
    app.registry.clear_all();

    let response = send(&app.router, "GET", "/api/cache", None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Available caches: none"));
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = send(&app.router, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
