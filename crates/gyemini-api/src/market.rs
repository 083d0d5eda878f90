use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::warn;

use gyemini_calc::dday::today_kst;
use gyemini_market::ipo;
use gyemini_types::api::{IpoResponse, MarketIndexResponse};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::ApiQuery;

const QUOTE_CACHE: &str = "public, max-age=300";
const IPO_CACHE: &str = "public, max-age=3600";

pub async fn exchange_rates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rates = state.market.exchange_rates().await.map_err(|e| {
        warn!("Exchange rates unavailable: {:#}", e);
        ApiError::Upstream("Exchange rates are temporarily unavailable".into())
    })?;

    Ok(([(header::CACHE_CONTROL, QUOTE_CACHE)], Json(rates)))
}

pub async fn market_index(State(state): State<AppState>) -> impl IntoResponse {
    let indices = state.market.market_indices().await;

    (
        [(header::CACHE_CONTROL, QUOTE_CACHE)],
        Json(MarketIndexResponse {
            indices,
            timestamp: Utc::now(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct IpoQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub async fn ipo_schedule(ApiQuery(query): ApiQuery<IpoQuery>) -> Result<impl IntoResponse, ApiError> {
    let today = today_kst();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        return Err(ApiError::BadRequest("month must be between 1 and 12".into()));
    }

    let ipos = ipo::for_month(year, month)?;

    Ok((
        [(header::CACHE_CONTROL, IPO_CACHE)],
        Json(IpoResponse {
            year,
            month,
            count: ipos.len(),
            ipos,
            timestamp: Utc::now(),
        }),
    ))
}
