use std::collections::HashMap;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use gyemini_calc::currency::{self, RateTable};
use gyemini_calc::interest::InterestInput;
use gyemini_calc::{dday, interest, salary, units};
use gyemini_crypto::{Algorithm, Operation};
use gyemini_types::api::CalculationResponse;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::ApiJson;

/// Body of `POST /api/calculate`: `{ "type": ..., "data": {...} }`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Calculation {
    Interest(InterestInput),
    Salary(SalaryInput),
    SalaryReverse(SalaryReverseInput),
    Dday(DdayInput),
    Unit(UnitInput),
    Currency(CurrencyInput),
    Crypto(CryptoInput),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    pub annual_salary: f64,
    #[serde(default)]
    pub small_business: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryReverseInput {
    pub target_net_monthly: f64,
    #[serde(default)]
    pub small_business: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdayInput {
    pub name: Option<String>,
    pub target_date: String,
    pub goal_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UnitInput {
    pub value: f64,
    pub from: String,
    pub to: String,
}

/// Without `rates`, the live table from the exchange feed is used.
#[derive(Debug, Deserialize)]
pub struct CurrencyInput {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rates: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
pub struct CryptoInput {
    pub algorithm: Algorithm,
    #[serde(default)]
    pub operation: Operation,
    pub text: String,
    pub key: Option<String>,
}

pub async fn calculate(
    State(state): State<AppState>,
    ApiJson(calculation): ApiJson<Calculation>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("Calculation request: {}", kind(&calculation));

    let result = match calculation {
        Calculation::Interest(input) => {
            to_value(blocking(move || interest::calculate(&input)).await??)?
        }
        Calculation::Salary(input) => {
            to_value(salary::net_from_annual(input.annual_salary, input.small_business)?)?
        }
        Calculation::SalaryReverse(input) => {
            to_value(salary::annual_from_net(input.target_net_monthly, input.small_business)?)?
        }
        Calculation::Dday(input) => {
            let target = dday::parse_date(&input.target_date)?;
            to_value(dday::calculate(
                input.name.as_deref(),
                target,
                input.goal_amount,
                dday::today_kst(),
            )?)?
        }
        Calculation::Unit(input) => to_value(units::convert(input.value, &input.from, &input.to)?)?,
        Calculation::Currency(input) => {
            let rates = match input.rates {
                Some(rates) => rates,
                None => {
                    state
                        .market
                        .exchange_rates()
                        .await
                        .map_err(|e| {
                            warn!("No live rates for currency calculation: {:#}", e);
                            ApiError::Upstream("Exchange rates are temporarily unavailable".into())
                        })?
                        .rates
                }
            };
            to_value(RateTable::new(rates).convert(input.amount, &input.from, &input.to)?)?
        }
        Calculation::Crypto(input) => {
            // PBKDF2 at 100k rounds is too slow for the async workers
            let transformed = blocking(move || {
                gyemini_crypto::transform(
                    input.algorithm,
                    input.operation,
                    &input.text,
                    input.key.as_deref(),
                )
            })
            .await??;
            to_value(transformed)?
        }
    };

    Ok(Json(CalculationResponse {
        success: true,
        result,
        timestamp: Utc::now(),
    }))
}

/// Self-description served on `GET /api/calculate`.
pub async fn describe() -> Json<Value> {
    let unit_groups: Vec<Value> = units::Category::ALL
        .iter()
        .map(|&category| {
            json!({
                "category": category,
                "label": category.label(),
                "units": units::units_in(category).collect::<Vec<_>>(),
            })
        })
        .collect();

    Json(json!({
        "name": "Gyemini Calculator API",
        "version": env!("CARGO_PKG_VERSION"),
        "usage": "POST /api/calculate with { \"type\": <type>, \"data\": {...} }",
        "types": [
            {
                "type": "interest",
                "description": "예금/적금 이자 계산",
                "example": { "amount": 10000000, "rate": 3.5, "period": 1, "periodUnit": "years",
                             "product": "deposit", "compounding": "simple", "taxRate": 15.4 }
            },
            {
                "type": "salary",
                "description": "연봉 실수령액 계산",
                "example": { "annualSalary": 50000000, "smallBusiness": false }
            },
            {
                "type": "salary_reverse",
                "description": "희망 실수령액으로 연봉 역산",
                "example": { "targetNetMonthly": 3500000, "smallBusiness": false }
            },
            {
                "type": "dday",
                "description": "D-day 계산",
                "example": { "name": "수능", "targetDate": "2026-11-19", "goalAmount": 1000000 }
            },
            {
                "type": "unit",
                "description": "단위 변환",
                "example": { "value": 10, "from": "km", "to": "mi" }
            },
            {
                "type": "currency",
                "description": "환율 계산 (rates 생략 시 실시간 환율)",
                "example": { "amount": 100, "from": "USD", "to": "KRW" }
            },
            {
                "type": "crypto",
                "description": "Base64 / AES / MD5 / SHA-256",
                "example": { "algorithm": "sha256", "operation": "encrypt", "text": "hello" }
            }
        ],
        "units": unit_groups,
        "currencies": currency::CURRENCIES,
    }))
}

fn kind(calculation: &Calculation) -> &'static str {
    match calculation {
        Calculation::Interest(_) => "interest",
        Calculation::Salary(_) => "salary",
        Calculation::SalaryReverse(_) => "salary_reverse",
        Calculation::Dday(_) => "dday",
        Calculation::Unit(_) => "unit",
        Calculation::Currency(_) => "currency",
        Calculation::Crypto(_) => "crypto",
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e)))
}

fn to_value<T: Serialize>(result: T) -> Result<Value, ApiError> {
    serde_json::to_value(result).map_err(|e| ApiError::Internal(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_bodies() {
        let calc: Calculation = serde_json::from_value(json!({
            "type": "salary_reverse",
            "data": { "targetNetMonthly": 3000000 }
        }))
        .unwrap();
        assert!(matches!(
            calc,
            Calculation::SalaryReverse(SalaryReverseInput { small_business: false, .. })
        ));

        let calc: Calculation = serde_json::from_value(json!({
            "type": "crypto",
            "data": { "algorithm": "md5", "text": "abc" }
        }))
        .unwrap();
        assert_eq!(kind(&calc), "crypto");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let parsed = serde_json::from_value::<Calculation>(json!({ "type": "mortgage", "data": {} }));
        assert!(parsed.is_err());
    }
}
