use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use gyemini_db::models::OwnedChange;
use gyemini_types::api::{
    Claims, CreatePostRequest, Pagination, PostDeletedResponse, PostListResponse, UpdatePostRequest,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::{AppState, convert, run_db};

pub const DEFAULT_AUTHOR: &str = "익명";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Page number (from 1) and clamped page size.
    pub fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }

    pub fn offset(page: u32, limit: u32) -> u64 {
        (page as u64 - 1) * limit as u64
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit) = query.resolve();
    let offset = PageQuery::offset(page, limit);

    let (total, posts) = run_db(&state, move |db| {
        let total = db.count_posts()?;
        let posts = db
            .list_posts(limit, offset)?
            .into_iter()
            .map(convert::post_summary)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((total, posts))
    })
    .await?;

    Ok(Json(PostListResponse {
        posts,
        pagination: Pagination::new(page, limit, total),
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (title, content) = required_fields(&req.title, &req.content)?;
    let author = req
        .author_name
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string();

    let post = run_db(&state, move |db| {
        let row = db.insert_post(&claims.sub, &title, &content, &author)?;
        convert::post(row)
    })
    .await?;

    info!("Post {} created by {}", post.id, post.user_id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// Counts a view, then returns the post.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let post = run_db(&state, move |db| db.view_post(id)?.map(convert::post).transpose())
        .await?
        .ok_or_else(post_not_found)?;

    Ok(Json(post))
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let (title, content) = required_fields(&req.title, &req.content)?;

    let change = run_db(&state, move |db| db.update_post(id, &claims.sub, &title, &content)).await?;
    match change {
        OwnedChange::Applied(row) => Ok(Json(convert::post(row)?)),
        OwnedChange::Missing => Err(post_not_found()),
        OwnedChange::NotOwner => Err(ApiError::Forbidden("Not the author of this post".into())),
    }
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let change = run_db(&state, move |db| db.delete_post(id, &claims.sub)).await?;
    match change {
        OwnedChange::Applied(()) => Ok(Json(PostDeletedResponse {
            message: "Post deleted".into(),
        })),
        OwnedChange::Missing => Err(post_not_found()),
        OwnedChange::NotOwner => Err(ApiError::Forbidden("Not the author of this post".into())),
    }
}

fn required_fields(title: &str, content: &str) -> Result<(String, String), ApiError> {
    let title = title.trim();
    if title.is_empty() || content.trim().is_empty() {
        return Err(ApiError::BadRequest("Title and content are required".into()));
    }
    Ok((title.to_string(), content.to_string()))
}

// Ids that cannot exist are reported the same way as missing ones
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| post_not_found())
}

fn post_not_found() -> ApiError {
    ApiError::NotFound("Post not found".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_clamps() {
        let q = PageQuery { page: Some(0), limit: Some(1000) };
        assert_eq!(q.resolve(), (1, MAX_PAGE_SIZE));

        let q = PageQuery { page: None, limit: Some(0) };
        assert_eq!(q.resolve(), (1, 1));

        assert_eq!(PageQuery::offset(3, 10), 20);
    }

    #[test]
    fn blank_fields_rejected() {
        assert!(required_fields("  ", "body").is_err());
        assert!(required_fields("title", "\n").is_err());
        assert_eq!(
            required_fields(" 제목 ", "본문").unwrap(),
            ("제목".to_string(), "본문".to_string())
        );
    }
}
