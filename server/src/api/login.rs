use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Deserialize;
use serde_json::{Value, json};

use super::json_body;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// `POST /api/login`: exchange an allow-listed username/password for a token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(body)?;

    let (Some(username), Some(password)) = (
        body.username.filter(|u| !u.is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    };

    if !state.credentials.check(&username, &password) {
        tracing::warn!("failed login attempt for '{username}'");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&username)?;
    tracing::info!("admin '{username}' logged in");

    Ok(Json(json!({ "success": true, "token": token })))
}
