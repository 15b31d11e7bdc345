//! Test that unusable request bodies and unknown paths get the JSON envelope.

use axum::http::{Method, StatusCode};

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_invalid_json_body() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/applications",
            None,
            Some(("application/json", b"{\"ign\": ".to_vec())),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.success());
    assert!(!response.message().is_empty());
}

#[tokio::test]
async fn test_missing_content_type() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(("text/plain", b"{}".to_vec())),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.success());
}

#[tokio::test]
async fn test_invalid_json_after_guard() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .send(
            Method::POST,
            "/api/news",
            Some(&token),
            Some(("application/json", b"not json".to_vec())),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.list_news().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_path_without_static_directory() {
    let app = TestApp::new();

    for uri in ["/", "/api/unknown", "/about.html"] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.message(), "Not found");
        assert!(!response.success());
    }
}
