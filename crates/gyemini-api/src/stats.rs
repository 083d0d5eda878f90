use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use gyemini_types::api::{RecordClickRequest, StatsResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{AppState, convert, run_db};

pub async fn list_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let calculators = run_db(&state, |db| {
        db.list_calculator_stats()?
            .into_iter()
            .map(convert::calculator_stat)
            .collect::<anyhow::Result<Vec<_>>>()
    })
    .await?;

    Ok(Json(StatsResponse { calculators }))
}

pub async fn record_click(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RecordClickRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let calculator_id = req
        .calculator_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("calculator_id is required".into()))?;

    debug!("Click on calculator {}", calculator_id);
    let id = calculator_id.clone();
    let stat = run_db(&state, move |db| {
        db.record_click(&id)?.map(convert::calculator_stat).transpose()
    })
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Unknown calculator: {}", calculator_id)))?;

    Ok(Json(stat))
}
