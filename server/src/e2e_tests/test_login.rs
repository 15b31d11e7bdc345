//! Test admin login against the configured allow-list.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_every_allow_listed_pair_gets_a_verifiable_token() {
    let app = TestApp::new();

    for (username, password) in [(ADMIN_USERNAME, ADMIN_PASSWORD), (COACH_USERNAME, COACH_PASSWORD)] {
        let token = app.login_as(username, password).await;
        let identity = app.state.tokens.verify(&token).unwrap();
        assert_eq!(identity.username, username);
    }
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new();

    let response = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "Invalid credentials" })
    );
}

#[tokio::test]
async fn test_pairs_are_not_mixed_across_accounts() {
    let app = TestApp::new();

    for (username, password) in [
        (ADMIN_USERNAME, COACH_PASSWORD),
        (COACH_USERNAME, ADMIN_PASSWORD),
        ("nobody", ADMIN_PASSWORD),
        ("Admin", ADMIN_PASSWORD),
    ] {
        let response = app
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{username}");
        assert!(response.body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let app = TestApp::new();

    for body in [
        json!({}),
        json!({ "username": "admin" }),
        json!({ "password": "hunter2" }),
        json!({ "username": "", "password": "hunter2" }),
    ] {
        let response = app.request(Method::POST, "/api/login", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(!response.success());
        assert_eq!(response.message(), "Username and password are required");
    }
}
