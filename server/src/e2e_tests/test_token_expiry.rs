//! Test that tokens stop working one hour after login.

use axum::http::{Method, StatusCode};

use crate::auth::TOKEN_LIFETIME_SECS;
use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_token_accepted_until_expiry() {
    let app = TestApp::new();
    let token = app.login().await;

    app.clock.advance_ms((TOKEN_LIFETIME_SECS - 1) * 1000);
    let response = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.state.tokens.verify(&token).is_ok());
}

#[tokio::test]
async fn test_token_rejected_at_expiry() {
    let app = TestApp::new();
    let token = app.login().await;

    app.clock.advance_ms(TOKEN_LIFETIME_SECS * 1000);
    let response = app
        .request(Method::GET, "/api/applications", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.message(), "Invalid or expired token.");
    assert!(app.state.tokens.verify(&token).is_err());
}

#[tokio::test]
async fn test_fresh_login_after_expiry_works() {
    let app = TestApp::new();
    let old = app.login().await;

    app.clock.advance_ms(2 * TOKEN_LIFETIME_SECS * 1000);
    let fresh = app.login().await;

    let response = app
        .request(Method::GET, "/api/applications", Some(&old), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(Method::GET, "/api/applications", Some(&fresh), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
