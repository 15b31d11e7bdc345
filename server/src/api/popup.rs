//! Promotional popup endpoints.
//!
//! Visitors fetch the single active banner. Admins publish a new banner,
//! which replaces the active one, or retract a banner by id.

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
use crate::types::{PopupDraft, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
}

/// `GET /api/popup`: the active banner, or `null`.
pub async fn active(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let popup = state.store.active_popup()?;
    Ok(Json(json!({ "success": true, "popup": popup })))
}

/// `POST /api/popup`
pub async fn publish(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    body: Result<Json<PopupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = json_body(body)?;
    let (Some(title), Some(message)) = (non_blank(body.title), non_blank(body.message)) else {
        return Err(ApiError::Validation(
            "Title and message are required.".to_string(),
        ));
    };

    let draft = PopupDraft {
        title,
        message,
        link: non_blank(body.link),
        link_text: non_blank(body.link_text),
        created_at: state.clock.now(),
    };
    let popup = state.store.publish_popup(draft)?;
    tracing::info!("popup {} published by '{}'", popup.id, admin.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "popup": popup })),
    ))
}

/// `DELETE /api/popup/{id}`: deactivate, keeping the record.
pub async fn retract(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, Resource::Popup)?;
    state
        .store
        .retract_popup(id, state.clock.now())?
        .ok_or(ApiError::NotFound(Resource::Popup))?;
    tracing::info!("popup {id} deactivated by '{}'", admin.username);

    Ok(Json(json!({
        "success": true,
        "message": "Popup deactivated successfully.",
    })))
}
