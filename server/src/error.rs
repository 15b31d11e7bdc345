//! API error taxonomy.
//!
//! Every failure is handled at the endpoint boundary and rendered as the
//! JSON envelope `{"success": false, "message": ...}` with a matching status
//! code. Store failures are logged with their cause; clients only see a
//! generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::TokenError;
use crate::store::StoreError;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Application,
    NewsArticle,
    Popup,
    ContactMessage,
}

impl Resource {
    const fn noun(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::NewsArticle => "news article",
            Self::Popup => "popup",
            Self::ContactMessage => "contact message",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::NewsArticle => "News article",
            Self::Popup => "Popup",
            Self::ContactMessage => "Contact message",
        }
    }
}

/// Error returned from API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// No bearer token, or a malformed `Authorization` header.
    Unauthenticated,
    /// A bearer token was presented but rejected.
    Forbidden,
    /// Login with a pair not in the allow-list.
    InvalidCredentials,
    /// A required field is missing or empty, or the body is unusable.
    Validation(String),
    /// The path id is not a well-formed record id.
    InvalidId(Resource),
    /// Well-formed id, no matching record.
    NotFound(Resource),
    /// No route matches the request path.
    UnknownRoute,
    /// The backing store failed.
    StoreUnavailable(StoreError),
    /// Any other server-side failure.
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::UnknownRoute => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Access denied. No token provided."),
            Self::Forbidden => write!(f, "Invalid or expired token."),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::Validation(message) => write!(f, "{message}"),
            Self::InvalidId(resource) => write!(f, "Invalid {} ID format.", resource.noun()),
            Self::NotFound(resource) => write!(f, "{} not found.", resource.title()),
            Self::UnknownRoute => write!(f, "Not found"),
            Self::StoreUnavailable(_) | Self::Internal(_) => {
                write!(f, "Server error. Please try again later.")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::StoreUnavailable(e) => tracing::error!("store error: {e}"),
            Self::Internal(reason) => tracing::error!("internal error: {reason}"),
            _ => {}
        }

        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Validation("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidId(Resource::Popup).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound(Resource::Application).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::StoreUnavailable(StoreError::Unavailable("down".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::InvalidId(Resource::NewsArticle).to_string(),
            "Invalid news article ID format."
        );
        assert_eq!(
            ApiError::NotFound(Resource::NewsArticle).to_string(),
            "News article not found."
        );
        assert_eq!(
            ApiError::NotFound(Resource::ContactMessage).to_string(),
            "Contact message not found."
        );
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_store_errors_hide_cause() {
        let error = ApiError::from(StoreError::Corrupt("secret detail".to_string()));
        assert!(!error.to_string().contains("secret detail"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
