//! Test the news feed.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;

async fn post_news(app: &TestApp, token: &str, title: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/news",
            Some(token),
            Some(json!({ "title": title, "description": "Roster update" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.body["newsItem"]["id"].as_str().unwrap().to_string()
}

fn titles(response: &TestResponse) -> Vec<String> {
    response.body["news"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_feed() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true, "news": [] }));
}

#[tokio::test]
async fn test_create_returns_item() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .request(
            Method::POST,
            "/api/news",
            Some(&token),
            Some(json!({
                "title": "  Finals  ",
                "description": "We made it",
                "bannerUrl": "/img/finals.png",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.success());
    let item = &response.body["newsItem"];
    assert_eq!(item["title"], "Finals");
    assert_eq!(item["description"], "We made it");
    assert_eq!(item["bannerUrl"], "/img/finals.png");
    assert!(item["publishedAt"].is_string());
}

#[tokio::test]
async fn test_banner_url_defaults_to_empty() {
    let app = TestApp::new();
    let token = app.login().await;
    post_news(&app, &token, "No banner").await;

    let response = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(response.body["news"][0]["bannerUrl"], "");
}

#[tokio::test]
async fn test_feed_is_newest_first() {
    let app = TestApp::new();
    let token = app.login().await;

    for (title, at) in [("middle", 5_000), ("oldest", 0), ("newest", 9_000)] {
        app.clock.set_ms(START_MS + at);
        post_news(&app, &token, title).await;
    }

    let response = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(titles(&response), ["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_same_timestamp_is_newest_insert_first() {
    let app = TestApp::new();
    let token = app.login().await;

    for title in ["first", "second", "third"] {
        post_news(&app, &token, title).await;
    }

    let response = app.request(Method::GET, "/api/news", None, None).await;
    assert_eq!(titles(&response), ["third", "second", "first"]);
}

#[tokio::test]
async fn test_missing_title_or_description() {
    let app = TestApp::new();
    let token = app.login().await;

    for body in [
        json!({ "description": "d" }),
        json!({ "title": "t" }),
        json!({ "title": "   ", "description": "d" }),
        json!({ "title": "t", "description": "" }),
    ] {
        let response = app
            .request(Method::POST, "/api/news", Some(&token), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.message(), "Title and description are required.");
    }
    assert!(app.store.list_news().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_malformed_id() {
    let app = TestApp::new();
    let token = app.login().await;

    let response = app
        .request(Method::DELETE, "/api/news/not-an-id", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "Invalid news article ID format." })
    );
}

#[tokio::test]
async fn test_delete_unknown_and_existing() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = post_news(&app, &token, "Temporary").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/news/{UNKNOWN_ID}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "News article not found.");
    assert_eq!(app.store.list_news().unwrap().len(), 1);

    let response = app
        .request(Method::DELETE, &format!("/api/news/{id}"), Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.success());
    assert!(app.store.list_news().unwrap().is_empty());

    let response = app
        .request(Method::DELETE, &format!("/api/news/{id}"), Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
