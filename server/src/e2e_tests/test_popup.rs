//! Test that at most one popup is active and retraction keeps the record.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_no_popup_initially() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/api/popup", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "popup": null }));
}

#[tokio::test]
async fn test_publish_makes_popup_active() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .request(
            Method::POST,
            "/api/popup",
            Some(&token),
            Some(json!({
                "title": "Merch drop",
                "message": "New jerseys are live",
                "link": "/merch.html",
                "linkText": "Shop now",
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let popup = &response.body["popup"];
    assert_eq!(popup["active"], true);
    assert_eq!(popup["linkText"], "Shop now");
    assert_eq!(popup["createdAt"], popup["updatedAt"]);

    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert_eq!(&active.body["popup"], popup);
}

#[tokio::test]
async fn test_optional_link_is_omitted() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app.publish_popup(&token, "Sale").await;
    assert!(response.body["popup"].get("link").is_none());
    assert!(response.body["popup"].get("linkText").is_none());
}

#[tokio::test]
async fn test_publishing_replaces_the_active_popup() {
    let app = TestApp::new();
    let token = app.login().await;

    let mut last = None;
    for i in 0..4 {
        app.clock.advance_ms(1_000);
        let response = app.publish_popup(&token, &format!("Popup {i}")).await;
        assert_eq!(response.status, StatusCode::CREATED);
        last = Some(response.body["popup"]["id"].clone());
    }

    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert_eq!(active.body["popup"]["id"], last.unwrap());
    assert_eq!(active.body["popup"]["title"], "Popup 3");

    // Retracting the active one leaves nothing else active.
    let id = active.body["popup"]["id"].as_str().unwrap();
    app.request(Method::DELETE, &format!("/api/popup/{id}"), Some(&token), None)
        .await;
    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert!(active.body["popup"].is_null());
}

#[tokio::test]
async fn test_concurrent_publishes_leave_one_active() {
    let app = TestApp::new();
    let token = app.login().await;

    let titles: Vec<String> = (0..16).map(|i| format!("Popup {i}")).collect();
    let publishes = titles.iter().map(|title| app.publish_popup(&token, title));
    for response in futures::future::join_all(publishes).await {
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let active = app.request(Method::GET, "/api/popup", None, None).await;
    let id = active.body["popup"]["id"].as_str().unwrap().to_string();
    app.request(Method::DELETE, &format!("/api/popup/{id}"), Some(&token), None)
        .await;

    assert!(app.store.active_popup().unwrap().is_none());
}

#[tokio::test]
async fn test_retract_keeps_record() {
    let app = TestApp::new();
    let token = app.login().await;
    let published = app.publish_popup(&token, "Sale").await;
    let id = published.body["popup"]["id"].as_str().unwrap().to_string();

    app.clock.advance_ms(60_000);
    let response = app
        .request(Method::DELETE, &format!("/api/popup/{id}"), Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());

    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert!(active.body["popup"].is_null());

    // Still addressable after retraction.
    let response = app
        .request(Method::DELETE, &format!("/api/popup/{id}"), Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_retract_bad_ids() {
    let app = TestApp::new();
    let token = app.login().await;
    let published = app.publish_popup(&token, "Sale").await;

    let response = app
        .request(Method::DELETE, "/api/popup/xyz", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid popup ID format.");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/popup/{UNKNOWN_ID}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Popup not found.");

    let active = app.request(Method::GET, "/api/popup", None, None).await;
    assert_eq!(active.body["popup"], published.body["popup"]);
}

#[tokio::test]
async fn test_missing_title_or_message() {
    let app = TestApp::new();
    let token = app.login().await;

    for body in [
        json!({ "message": "m" }),
        json!({ "title": "t", "message": "  " }),
    ] {
        let response = app
            .request(Method::POST, "/api/popup", Some(&token), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.message(), "Title and message are required.");
    }
    assert!(app.store.active_popup().unwrap().is_none());
}
