//! Integration tests for static file serving and the live reload route.
//!
//! Exercises the router directly via `tower::ServiceExt::oneshot`, with the
//! served site laid out in a temporary directory.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use liveserve_server::{ServerConfig, build_app};
use tempfile::TempDir;
use tower::ServiceExt;

/// Create a site fixture with an index page, a stylesheet, and a nested page.
fn site_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("index.html"),
        "<html><body><h1>Home</h1></body></html>",
    )
    .unwrap();
    std::fs::create_dir(dir.path().join("css")).unwrap();
    std::fs::write(dir.path().join("css/site.css"), "body { margin: 0; }").unwrap();
    std::fs::create_dir(dir.path().join("guide")).unwrap();
    std::fs::write(
        dir.path().join("guide/index.html"),
        "<html><body><h1>Guide</h1></body></html>",
    )
    .unwrap();
    dir
}

fn app(root: &Path, live_reload_enabled: bool) -> Router {
    let config = ServerConfig {
        root_dir: root.to_path_buf(),
        live_reload_enabled,
        ..ServerConfig::default()
    };
    build_app(&config).unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let site = site_fixture();

    let (status, headers, body) = get(app(site.path(), false), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Home</h1>"));
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_directory_path_serves_its_index() {
    let site = site_fixture();

    let (status, _, body) = get(app(site.path(), false), "/guide").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Guide</h1>"));
}

#[tokio::test]
async fn test_asset_served_with_mime_type() {
    let site = site_fixture();

    let (status, headers, body) = get(app(site.path(), false), "/css/site.css").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "body { margin: 0; }");
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/css");
}

#[tokio::test]
async fn test_missing_path_returns_not_found() {
    let site = site_fixture();

    let (status, _, _) = get(app(site.path(), false), "/does-not-exist.html").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_are_not_cacheable() {
    let site = site_fixture();

    let (_, headers, _) = get(app(site.path(), false), "/").await;

    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
}

#[tokio::test]
async fn test_parent_dir_traversal_is_rejected() {
    // Nest the served root so the secret sits inside the tempdir but
    // outside the root, and cleanup stays owned by TempDir
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("site");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), "<html></html>").unwrap();
    std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();

    let (status, _, body) = get(app(&root, false), "/../secret.txt").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("secret"));
}

#[tokio::test]
async fn test_html_gets_reload_script_when_live_reload_enabled() {
    let site = site_fixture();

    let (status, _, body) = get(app(site.path(), true), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/ws/live-reload"));
    // Script lands inside the document body
    let script_pos = body.find("<script>").unwrap();
    let body_close = body.find("</body>").unwrap();
    assert!(script_pos < body_close);
}

#[tokio::test]
async fn test_html_untouched_when_live_reload_disabled() {
    let site = site_fixture();

    let (_, _, body) = get(app(site.path(), false), "/").await;

    assert!(!body.contains("/ws/live-reload"));
}

#[tokio::test]
async fn test_assets_never_get_reload_script() {
    let site = site_fixture();

    let (_, _, body) = get(app(site.path(), true), "/css/site.css").await;

    assert_eq!(body, "body { margin: 0; }");
}

#[tokio::test]
async fn test_ws_route_registered_when_live_reload_enabled() {
    let site = site_fixture();

    // Plain GET without upgrade headers is rejected, but the route exists
    let (status, _, _) = get(app(site.path(), true), "/ws/live-reload").await;

    assert_ne!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_route_absent_when_live_reload_disabled() {
    let site = site_fixture();

    let (status, _, _) = get(app(site.path(), false), "/ws/live-reload").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
