use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use gyemini_calc::dday::parse_date;
use gyemini_types::api::{Claims, CreateDdayRequest, Success};
use gyemini_types::models::DdayFavorite;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, convert, run_db};

pub async fn list_ddays(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let ddays = run_db(&state, move |db| {
        db.list_ddays(&claims.sub)?
            .into_iter()
            .map(convert::dday)
            .collect::<anyhow::Result<Vec<DdayFavorite>>>()
    })
    .await?;

    Ok(Json(Success::new(ddays)))
}

pub async fn create_dday(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateDdayRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    let target_date = parse_date(&req.target_date)?;
    if let Some(goal) = req.goal_amount {
        if !goal.is_finite() || goal < 0.0 {
            return Err(ApiError::BadRequest("goalAmount must be a non-negative number".into()));
        }
    }

    let id = Uuid::new_v4().to_string();
    let date = target_date.format("%Y-%m-%d").to_string();
    let dday = run_db(&state, move |db| {
        let row = db.insert_dday(&id, &claims.sub, &name, &date, req.goal_amount)?;
        convert::dday(row)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(Success::new(dday))))
}

pub async fn delete_dday(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let not_found = || ApiError::NotFound("D-day not found".into());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?.to_string();

    let deleted = run_db(&state, move |db| db.delete_dday(&id, &claims.sub)).await?;
    if !deleted {
        return Err(not_found());
    }

    Ok(Json(json!({ "success": true })))
}
