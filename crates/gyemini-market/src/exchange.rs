use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate};
use gyemini_types::api::ExchangeRatesResponse;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::MarketClient;

pub const BASE: &str = "USD";

/// exchangerate-api.com v4 payload.
#[derive(Debug, Deserialize)]
struct PrimaryPayload {
    base: String,
    time_last_updated: Option<i64>,
    rates: HashMap<String, f64>,
}

/// Frankfurter payload. The base currency is not listed in `rates`.
#[derive(Debug, Deserialize)]
struct FallbackPayload {
    base: String,
    date: Option<String>,
    rates: HashMap<String, f64>,
}

impl MarketClient {
    /// USD-quoted rates from the primary feed, or the fallback when the
    /// primary fails for any reason.
    pub async fn exchange_rates(&self) -> Result<ExchangeRatesResponse> {
        match self.primary_rates().await {
            Ok(rates) => return Ok(rates),
            Err(e) => warn!("Primary exchange feed failed: {:#}", e),
        }

        self.fallback_rates()
            .await
            .context("both exchange rate feeds failed")
    }

    async fn primary_rates(&self) -> Result<ExchangeRatesResponse> {
        let url = &self.config.exchange_primary_url;
        debug!("Fetching exchange rates from {}", url);
        let payload: PrimaryPayload = self.get_json(self.http.get(url)).await?;
        from_primary(payload)
    }

    async fn fallback_rates(&self) -> Result<ExchangeRatesResponse> {
        let url = &self.config.exchange_fallback_url;
        debug!("Fetching exchange rates from {}", url);
        let payload: FallbackPayload = self.get_json(self.http.get(url)).await?;
        from_fallback(payload)
    }
}

fn from_primary(payload: PrimaryPayload) -> Result<ExchangeRatesResponse> {
    if !payload.base.eq_ignore_ascii_case(BASE) {
        bail!("unexpected base currency {}", payload.base);
    }
    if payload.rates.is_empty() {
        bail!("empty rate table");
    }

    let mut rates = payload.rates;
    rates.insert(BASE.to_string(), 1.0);

    Ok(ExchangeRatesResponse {
        base: BASE.to_string(),
        rates,
        updated_at: payload
            .time_last_updated
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        source: "exchangerate-api".to_string(),
    })
}

fn from_fallback(payload: FallbackPayload) -> Result<ExchangeRatesResponse> {
    if !payload.base.eq_ignore_ascii_case(BASE) {
        bail!("unexpected base currency {}", payload.base);
    }
    if payload.rates.is_empty() {
        bail!("empty rate table");
    }

    let mut rates = payload.rates;
    rates.insert(BASE.to_string(), 1.0);

    let updated_at = payload
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());

    Ok(ExchangeRatesResponse {
        base: BASE.to_string(),
        rates,
        updated_at,
        source: "frankfurter".to_string(),
    })
}
