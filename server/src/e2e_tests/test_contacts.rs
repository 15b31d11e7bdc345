//! Test the contact form inbox.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use crate::e2e_tests::helpers::*;

fn contact_body() -> Value {
    json!({
        "name": "Ana",
        "email": "ana@example.com",
        "subject": "Sponsorship",
        "message": "Let's talk",
    })
}

async fn send_contact(app: &TestApp) -> String {
    let response = app
        .request(Method::POST, "/api/contacts", None, Some(contact_body()))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
    response.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_send_then_read_inbox() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = send_contact(&app).await;

    let response = app
        .request(Method::GET, "/api/contacts", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let contacts = response.body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], id.as_str());
    assert_eq!(contacts[0]["status"], "unread");
    assert_eq!(contacts[0]["subject"], "Sponsorship");
}

#[tokio::test]
async fn test_missing_fields() {
    let app = TestApp::new();

    let mut body = contact_body();
    body["email"] = json!(" ");
    let response = app
        .request(Method::POST, "/api/contacts", None, Some(body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        "Name, email, subject and message are required."
    );
    assert!(app.store.list_contacts().unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_read_and_unread() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = send_contact(&app).await;
    let uri = format!("/api/contacts/{id}");

    let response = app
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "status": "read" })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["contact"]["status"], "read");

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "unread" })),
        )
        .await;
    assert_eq!(response.body["contact"]["status"], "unread");

    let response = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "status": "archived" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.message(),
        r#"Invalid status. Must be "read" or "unread"."#
    );
}

#[tokio::test]
async fn test_non_string_status_is_rejected() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = send_contact(&app).await;

    for body in [json!({ "status": 5 }), json!({ "status": true }), json!({})] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/contacts/{id}"),
                Some(&token),
                Some(body.clone()),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            response.message(),
            r#"Invalid status. Must be "read" or "unread"."#
        );
    }
    assert_eq!(app.store.list_contacts().unwrap()[0].status.as_str(), "unread");
}

#[tokio::test]
async fn test_delete() {
    let app = TestApp::new();
    let token = app.login().await;
    let id = send_contact(&app).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/contacts/{id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["deletedContact"]["id"], id.as_str());

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/contacts/{id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.message(), "Contact message not found.");

    let response = app
        .request(Method::DELETE, "/api/contacts/123", Some(&token), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message(), "Invalid contact message ID format.");
}
