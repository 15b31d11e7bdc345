//! Access guard for admin-only routes.
//!
//! The guard is axum middleware layered onto the protected routes only. It
//! keeps no state between requests:
//!
//! - no `Authorization: Bearer <token>` header: 401, the token is never tried
//! - a token the [`TokenAuthority`](super::TokenAuthority) rejects: 403
//! - otherwise the verified [`AdminIdentity`] is inserted into the request
//!   extensions and the request continues

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `None` when the header is absent, not UTF-8, uses another scheme,
/// or carries an empty token.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum middleware that requires a valid admin token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::debug!("rejected {} {}: no bearer token", request.method(), request.uri());
        return ApiError::Unauthenticated.into_response();
    };

    match state.tokens.verify(token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("rejected {} {}: {e}", request.method(), request.uri());
            ApiError::Forbidden.into_response()
        }
    }
}
