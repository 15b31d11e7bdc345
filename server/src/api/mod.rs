//! HTTP handlers for the JSON API.
//!
//! Handlers validate input, call the record store, and answer with the
//! envelope `{"success": true, ...}`. Failures are returned as
//! [`ApiError`](crate::error::ApiError), which renders the failure envelope.

pub mod applications;
pub mod contacts;
pub mod login;
pub mod news;
pub mod popup;

use axum::{Json, extract::rejection::JsonRejection};

use crate::error::{ApiError, Resource};
use crate::types::RecordId;

/// Unwrap a JSON body, turning extractor rejections into a 400 envelope.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Parse a path id for `resource`.
fn parse_id(raw: &str, resource: Resource) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(resource))
}

/// Fallback for unmatched paths when no static directory is served.
pub async fn not_found() -> ApiError {
    ApiError::UnknownRoute
}
