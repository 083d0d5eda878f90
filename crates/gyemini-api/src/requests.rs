use std::sync::LazyLock;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use gyemini_types::api::{ContactCreatedResponse, ContactListResponse, CreateContactRequest, Pagination};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::posts::PageQuery;
use crate::{AppState, convert, run_db};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
}

pub async fn list_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RequestListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, limit) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve();
    let offset = PageQuery::offset(page, limit);
    let status = query
        .status
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "all");

    let (total, requests) = run_db(&state, move |db| {
        let total = db.count_requests(status.as_deref())?;
        let requests = db
            .list_requests(status.as_deref(), limit, offset)?
            .into_iter()
            .map(convert::contact_request)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((total, requests))
    })
    .await?;

    Ok(Json(ContactListResponse {
        requests,
        pagination: Pagination::new(page, limit, total),
    }))
}

pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();
    let subject = req.subject.trim().to_string();
    let message = req.message.trim().to_string();

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".into()));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest("Invalid email format".into()));
    }

    let request = run_db(&state, move |db| {
        let row = db.insert_request(&name, &email, &subject, &message)?;
        convert::contact_request(row)
    })
    .await?;

    info!("Contact request {} received", request.id);
    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            message: "Request submitted successfully".into(),
            data: request,
        }),
    ))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("hong@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.kr"));
        assert!(!is_valid_email("hong@example"));
        assert!(!is_valid_email("hong example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }
}
