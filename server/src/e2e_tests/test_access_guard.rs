//! Test which routes require a bearer token and how bad tokens are answered.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;

use crate::auth::TokenAuthority;
use crate::e2e_tests::helpers::*;
use crate::time::ManualTimeSource;

const PROTECTED: [(&str, &str); 11] = [
    ("GET", "/api/applications"),
    ("PUT", "/api/applications/6553f100abcdef012300002a"),
    ("DELETE", "/api/applications/6553f100abcdef012300002a"),
    ("POST", "/api/news"),
    ("DELETE", "/api/news/6553f100abcdef012300002a"),
    ("POST", "/api/popup"),
    ("DELETE", "/api/popup/6553f100abcdef012300002a"),
    ("GET", "/api/contacts"),
    ("PUT", "/api/contacts/6553f100abcdef012300002a"),
    ("DELETE", "/api/contacts/6553f100abcdef012300002a"),
    ("PUT", "/api/applications/not-an-id"),
];

fn method(name: &str) -> Method {
    name.parse().unwrap()
}

#[tokio::test]
async fn test_status_update_without_token_is_unauthenticated() {
    let app = TestApp::new();
    let id = app.submit_application("Foo").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/applications/{id}"),
            None,
            Some(json!({ "status": "approved" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({ "success": false, "message": "Access denied. No token provided." })
    );

    // The record is untouched.
    let token = app.login().await;
    let listed = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    assert_eq!(listed.body["applications"][0]["status"], "pending");
}

#[tokio::test]
async fn test_every_protected_route_requires_a_token() {
    let app = TestApp::new();

    for (name, uri) in PROTECTED {
        let response = app
            .request(method(name), uri, None, Some(json!({})))
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{name} {uri}");
        assert!(!response.success());
    }
}

#[tokio::test]
async fn test_every_protected_route_rejects_a_garbage_token() {
    let app = TestApp::new();

    for (name, uri) in PROTECTED {
        let response = app
            .request(method(name), uri, Some("not.a.jwt"), Some(json!({})))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{name} {uri}");
        assert_eq!(response.message(), "Invalid or expired token.");
    }
}

#[tokio::test]
async fn test_malformed_authorization_header_is_unauthenticated() {
    let app = TestApp::new();
    let token = app.login().await;

    for value in [
        format!("Basic {token}"),
        format!("bearer {token}"),
        token.clone(),
        "Bearer ".to_string(),
    ] {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/applications")
            .header(header::AUTHORIZATION, value.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.send_request(request).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{value}");
    }
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_forbidden() {
    let app = TestApp::new();
    let other = TokenAuthority::new(
        b"some-other-secret",
        Arc::new(ManualTimeSource::new(START_MS)),
    )
    .unwrap();
    let forged = other.issue(ADMIN_USERNAME).unwrap();

    let response = app
        .request(Method::GET, "/api/applications", Some(&forged), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = TestApp::new();

    for uri in ["/api/news", "/api/popup"] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert!(response.success());
    }

    let response = app
        .request(
            Method::POST,
            "/api/applications",
            None,
            Some(application_body("Foo")),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}
