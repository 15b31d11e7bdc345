//! News feed endpoints. Reading is public; writing needs an admin token.

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
use crate::types::{NewsDraft, NewsItem, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

/// `GET /api/news`, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut news = state.store.list_news()?;
    NewsItem::sort_newest_first(&mut news);
    Ok(Json(json!({ "success": true, "news": news })))
}

/// `POST /api/news`
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    body: Result<Json<NewsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = json_body(body)?;
    let (Some(title), Some(description)) = (non_blank(body.title), non_blank(body.description))
    else {
        return Err(ApiError::Validation(
            "Title and description are required.".to_string(),
        ));
    };

    let draft = NewsDraft {
        title,
        description,
        banner_url: non_blank(body.banner_url).unwrap_or_default(),
        published_at: state.clock.now(),
    };
    let news_item = state.store.insert_news(draft)?;
    tracing::info!(
        "news article {} published by '{}'",
        news_item.id,
        admin.username
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "newsItem": news_item })),
    ))
}

/// `DELETE /api/news/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, Resource::NewsArticle)?;
    state
        .store
        .remove_news(id)?
        .ok_or(ApiError::NotFound(Resource::NewsArticle))?;
    tracing::info!("news article {id} deleted by '{}'", admin.username);

    Ok(Json(json!({
        "success": true,
        "message": "News article deleted successfully.",
    })))
}
