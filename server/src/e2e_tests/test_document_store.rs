//! Test the full flow against the document store, including a restart.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_flow_against_document_store() {
    let dir = tempfile::tempdir().unwrap();
    let app = TestApp::document(&dir.path().join("site.redb"));
    let token = app.login().await;

    let id = app.submit_application("Foo").await;
    let response = app
        .request(
            Method::PUT,
            &format!("/api/applications/{id}"),
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["application"]["ign"], "Foo");

    for i in 0..3 {
        let response = app.publish_popup(&token, &format!("Popup {i}")).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert_eq!(active.body["popup"]["title"], "Popup 2");

    let response = app
        .request(Method::DELETE, "/api/news/not-an-id", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid news article ID format.");
}

#[tokio::test]
async fn test_records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.redb");

    let id = {
        let app = TestApp::document(&path);
        let token = app.login().await;
        app.request(
            Method::POST,
            "/api/news",
            Some(&token),
            Some(json!({ "title": "Persisted", "description": "Still here" })),
        )
        .await;
        app.submit_application("Foo").await
    };

    let app = TestApp::document(&path);
    let token = app.login().await;

    let news = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(news.body["news"][0]["title"], "Persisted");

    let applications = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    assert_eq!(applications.body["applications"][0]["id"], id.as_str());
    assert_eq!(applications.body["applications"][0]["status"], "pending");
}
