//! Recruitment application endpoints.
//!
//! Submitting is public. Listing, deciding and deleting require an admin
//! token (enforced by the router, not here).

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
use crate::types::{ApplicationDraft, ApplicationStatus};

/// Body of a status change. Any JSON type is accepted so that a
/// non-string status gets the same message as an unknown one.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<Value>,
}

/// `GET /api/applications`
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let applications = state.store.list_applications()?;
    Ok(Json(json!({ "success": true, "applications": applications })))
}

/// `POST /api/applications`
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Value::Object(fields) = json_body(body)? else {
        return Err(ApiError::Validation(
            "Application must be a JSON object.".to_string(),
        ));
    };

    let draft = ApplicationDraft::new(fields, state.clock.now()).map_err(|missing| {
        ApiError::Validation(format!("Missing required fields: {}", missing.join(", ")))
    })?;
    let application = state.store.insert_application(draft)?;
    tracing::info!("new application received (id: {})", application.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Application submitted successfully",
            "id": application.id,
        })),
    ))
}

/// `PUT /api/applications/{id}`
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
        .and_then(ApplicationStatus::decision)
        .ok_or_else(|| {
            ApiError::Validation(r#"Invalid status. Must be "approved" or "rejected"."#.to_string())
        })?;
    let id = parse_id(&id, Resource::Application)?;

    let application = state
        .store
        .update_application_status(id, status)?
        .ok_or(ApiError::NotFound(Resource::Application))?;
    tracing::info!(
        "application {id} status updated to {status} by '{}'",
        admin.username
    );

    Ok(Json(json!({
        "success": true,
        "message": format!("Application status updated to {status}"),
        "application": application,
    })))
}

/// `DELETE /api/applications/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, Resource::Application)?;
    let removed = state
        .store
        .remove_application(id)?
        .ok_or(ApiError::NotFound(Resource::Application))?;
    tracing::info!("application {id} deleted by '{}'", admin.username);

    Ok(Json(json!({ "success": true, "deletedApplication": removed })))
}
