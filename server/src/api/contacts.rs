//! Contact form endpoints. Sending is public; the inbox is admin-only.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{json_body, parse_id};
use crate::auth::AdminIdentity;
use crate::error::{ApiError, Resource};
use crate::state::AppState;
use crate::types::{ContactDraft, ContactStatus, non_blank};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a status change. Any JSON type is accepted so that a
/// non-string status gets the same message as an unknown one.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<Value>,
}

/// `GET /api/contacts`
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let contacts = state.store.list_contacts()?;
    Ok(Json(json!({ "success": true, "contacts": contacts })))
}

/// `POST /api/contacts`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = json_body(body)?;
    let (Some(name), Some(email), Some(subject), Some(message)) = (
        non_blank(body.name),
        non_blank(body.email),
        non_blank(body.subject),
        non_blank(body.message),
    ) else {
        return Err(ApiError::Validation(
            "Name, email, subject and message are required.".to_string(),
        ));
    };

    let draft = ContactDraft {
        name,
        email,
        subject,
        message,
        submitted_at: state.clock.now(),
    };
    let contact = state.store.insert_contact(draft)?;
    tracing::info!("new contact message received (id: {})", contact.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Message sent successfully",
            "id": contact.id,
        })),
    ))
}

/// `PUT /api/contacts/{id}`
pub async fn update_status(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(body)?;
    let status = body
        .status
        .as_ref()
        .and_then(Value::as_str)
        .and_then(ContactStatus::parse)
        .ok_or_else(|| {
            ApiError::Validation(r#"Invalid status. Must be "read" or "unread"."#.to_string())
        })?;
    let id = parse_id(&id, Resource::ContactMessage)?;

    let contact = state
        .store
        .update_contact_status(id, status)?
        .ok_or(ApiError::NotFound(Resource::ContactMessage))?;
    tracing::info!(
        "contact message {id} marked {} by '{}'",
        status.as_str(),
        admin.username
    );

    Ok(Json(json!({ "success": true, "contact": contact })))
}

/// `DELETE /api/contacts/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, Resource::ContactMessage)?;
    let removed = state
        .store
        .remove_contact(id)?
        .ok_or(ApiError::NotFound(Resource::ContactMessage))?;
    tracing::info!("contact message {id} deleted by '{}'", admin.username);

    Ok(Json(json!({ "success": true, "deletedContact": removed })))
}
