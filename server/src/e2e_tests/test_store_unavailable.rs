//! Test that a failing store becomes a 500 envelope without leaking detail.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::store::{RecordStore, StoreError};
use crate::time::ManualTimeSource;
use crate::types::{
    Application, ApplicationDraft, ApplicationStatus, ContactDraft, ContactMessage, ContactStatus,
    NewsDraft, NewsItem, PopupBanner, PopupDraft, RecordId,
};

/// A store whose backend is always down.
struct UnreachableStore;

fn down<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("connection refused by db-host:27017".to_string()))
}

impl RecordStore for UnreachableStore {
    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
    fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        down()
    }
    fn insert_application(&self, _: ApplicationDraft) -> Result<Application, StoreError> {
        down()
    }
    fn update_application_status(
        &self,
        _: RecordId,
        _: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        down()
    }
    fn remove_application(&self, _: RecordId) -> Result<Option<Application>, StoreError> {
        down()
    }
    fn list_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        down()
    }
    fn insert_news(&self, _: NewsDraft) -> Result<NewsItem, StoreError> {
        down()
    }
    fn remove_news(&self, _: RecordId) -> Result<Option<NewsItem>, StoreError> {
        down()
    }
    fn active_popup(&self) -> Result<Option<PopupBanner>, StoreError> {
        down()
    }
    fn publish_popup(&self, _: PopupDraft) -> Result<PopupBanner, StoreError> {
        down()
    }
    fn retract_popup(
        &self,
        _: RecordId,
        _: DateTime<Utc>,
    ) -> Result<Option<PopupBanner>, StoreError> {
        down()
    }
    fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        down()
    }
    fn insert_contact(&self, _: ContactDraft) -> Result<ContactMessage, StoreError> {
        down()
    }
    fn update_contact_status(
        &self,
        _: RecordId,
        _: ContactStatus,
    ) -> Result<Option<ContactMessage>, StoreError> {
        down()
    }
    fn remove_contact(&self, _: RecordId) -> Result<Option<ContactMessage>, StoreError> {
        down()
    }
}

fn app() -> TestApp {
    TestApp::with_store(
        Arc::new(UnreachableStore),
        Arc::new(ManualTimeSource::new(START_MS)),
        None,
    )
}

#[tokio::test]
async fn test_public_reads_report_server_error() {
    let app = app();

    for uri in ["/api/news", "/api/popup"] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(
            response.body,
            json!({ "success": false, "message": "Server error. Please try again later." })
        );
        assert!(!response.text.contains("db-host"));
    }
}

#[tokio::test]
async fn test_writes_report_server_error() {
    let app = app();
    let token = app.login().await;

    let response = app
        .request(
            Method::POST,
            "/api/applications",
            None,
            Some(application_body("Foo")),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/news/{UNKNOWN_ID}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_validation_runs_before_the_store() {
    let app = app();

    let response = app
        .request(Method::POST, "/api/applications", None, Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
