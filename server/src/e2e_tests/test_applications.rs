//! Test the application submission and review flow.

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_submit_then_list_shows_pending_record() {
    let app = TestApp::new();
    let token = app.login().await;
    let before = app.state.clock.now();

    let response = app
        .request(
            Method::POST,
            "/api/applications",
            None,
            Some(application_body("Foo")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.success());
    assert_eq!(response.message(), "Application submitted successfully");
    let id = response.body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let applications = listed.body["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);

    let record = &applications[0];
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["ign"], "Foo");
    assert_eq!(record["favoriteHero"], "X");
    assert_eq!(record["status"], "pending");
    let submitted_at: DateTime<Utc> = record["submittedAt"].as_str().unwrap().parse().unwrap();
    assert!(submitted_at >= before);
}

#[tokio::test]
async fn test_optional_fields_are_kept() {
    let app = TestApp::new();
    let token = app.login().await;

    let mut body = application_body("Foo");
    body["role"] = json!("Tank");
    body["email"] = json!("foo@example.com");
    app.request(Method::POST, "/api/applications", None, Some(body))
        .await;

    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    let record = &listed.body["applications"][0];
    assert_eq!(record["role"], "Tank");
    assert_eq!(record["email"], "foo@example.com");
}

#[tokio::test]
async fn test_client_cannot_choose_status_or_id() {
    let app = TestApp::new();
    let token = app.login().await;

    let mut body = application_body("Foo");
    body["status"] = json!("approved");
    body["id"] = json!("000000000000000000000000");
    body["submittedAt"] = json!("1999-01-01T00:00:00Z");
    let response = app
        .request(Method::POST, "/api/applications", None, Some(body))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    let record = &listed.body["applications"][0];
    assert_eq!(record["status"], "pending");
    assert_eq!(record["id"], response.body["id"]);
    assert_ne!(record["submittedAt"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_missing_required_fields_are_listed() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/applications",
            None,
            Some(json!({ "ign": "Foo", "rank": "  ", "region": "NA", "experience": "2y" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body,
        json!({
            "success": false,
            "message": "Missing required fields: rank, favoriteHero, whyJoin",
        })
    );
    assert!(app.store.list_applications().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let app = TestApp::new();

    let response = app
        .request(Method::POST, "/api/applications", None, Some(json!(["ign"])))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.success());
}

#[tokio::test]
async fn test_approve_then_reject() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = app.submit_application("Foo").await;
    let uri = format!("/api/applications/{id}");

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Application status updated to approved");
    assert_eq!(response.body["application"]["status"], "approved");
    assert_eq!(response.body["application"]["ign"], "Foo");

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "rejected" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["application"]["status"], "rejected");
}

#[tokio::test]
async fn test_invalid_status_never_mutates() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = app.submit_application("Foo").await;
    let before = app.store.list_applications().unwrap();

    for body in [
        json!({ "status": "pending" }),
        json!({ "status": "APPROVED" }),
        json!({ "status": "" }),
        json!({ "status": 1 }),
        json!({ "status": ["approved"] }),
        json!({ "status": null }),
        json!({}),
    ] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/applications/{id}"),
                Some(&token),
                Some(body.clone()),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            response.message(),
            r#"Invalid status. Must be "approved" or "rejected"."#,
            "{body}"
        );
    }

    assert_eq!(app.store.list_applications().unwrap(), before);
}

#[tokio::test]
async fn test_status_update_bad_ids() {
    let app = TestApp::new();
    let token = app.login().await;
    app.submit_application("Foo").await;
    let before = app.store.list_applications().unwrap();

    let response = app
        .request(
            Method::PUT,
            "/api/applications/not-an-id",
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid application ID format.");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/applications/{UNKNOWN_ID}"),
            Some(&token),
            Some(json!({ "status": "approved" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Application not found.");

    assert_eq!(app.store.list_applications().unwrap(), before);
}

#[tokio::test]
async fn test_delete_returns_removed_record() {
    let app = TestApp::new();
    let token = app.login().await;
    let kept = app.submit_application("Kept").await;
    let removed = app.submit_application("Removed").await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/applications/{removed}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["deletedApplication"]["id"], removed.as_str());
    assert_eq!(response.body["deletedApplication"]["ign"], "Removed");

    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    let applications = listed.body["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["id"], kept.as_str());
}

#[tokio::test]
async fn test_delete_unknown_is_not_found_and_changes_nothing() {
    let app = TestApp::new();
    let token = app.login().await;
    app.submit_application("Foo").await;
    let before = app.store.list_applications().unwrap();

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/applications/{UNKNOWN_ID}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.list_applications().unwrap(), before);
}

#[tokio::test]
async fn test_listing_keeps_submission_order() {
    let app = TestApp::new();
    let token = app.login().await;

    let mut ids = Vec::new();
    for ign in ["A", "B", "C"] {
        ids.push(app.submit_application(ign).await);
        app.clock.advance_ms(10);
    }

    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    let listed_ids: Vec<&str> = listed.body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed_ids, ids);
}
