//! Test the static site fallback.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::*;

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
    std::fs::write(dir.path().join("about.html"), "<h1>About</h1>").unwrap();
    dir
}

#[tokio::test]
async fn test_root_serves_index() {
    let dir = site();
    let app = TestApp::with_public_directory(dir.path());

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "<h1>Home</h1>");

    let response = app.request(Method::GET, "/about.html", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "<h1>About</h1>");
}

#[tokio::test]
async fn test_api_routes_take_precedence() {
    let dir = site();
    let app = TestApp::with_public_directory(dir.path());

    let response = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());

    let response = app.request(Method::GET, "/missing.html", None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_path_keeps_json_envelope() {
    let dir = site();
    let app = TestApp::with_public_directory(dir.path());

    for (method, uri) in [
        (Method::GET, "/api"),
        (Method::GET, "/api/nope"),
        (Method::POST, "/api/news/extra/segments"),
    ] {
        let response = app.request(method, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(
            response.body,
            serde_json::json!({ "success": false, "message": "Not found" })
        );
    }
}
