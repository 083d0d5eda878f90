use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CalculatorStat, ContactRequest, Ipo, MarketIndex, PostSummary};

// -- Identity --

/// Claims carried by an anonymous identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub token: String,
}

// -- Envelopes --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{ success: true, data }` wrapper used by the D-day endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit as u64) };
        Self { page, limit, total, total_pages }
    }
}

// -- D-days --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDdayRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_date: String,
    pub goal_amount: Option<f64>,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDeletedResponse {
    pub message: String,
}

// -- Contact requests --

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub message: String,
    pub data: ContactRequest,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactListResponse {
    pub requests: Vec<ContactRequest>,
    pub pagination: Pagination,
}

// -- Calculator stats --

#[derive(Debug, Deserialize)]
pub struct RecordClickRequest {
    pub calculator_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub calculators: Vec<CalculatorStat>,
}

// -- Proxies --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRatesResponse {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarketIndexResponse {
    pub indices: BTreeMap<String, MarketIndex>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IpoResponse {
    pub year: i32,
    pub month: u32,
    pub ipos: Vec<Ipo>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

// -- Calculations --

#[derive(Debug, Serialize)]
pub struct CalculationResponse<T> {
    pub success: bool,
    pub result: T,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).total_pages, 2);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(1, 10, 25)).unwrap();
        assert_eq!(json["totalPages"], 3);
    }

    #[test]
    fn dday_request_accepts_client_field_names() {
        let req: CreateDdayRequest = serde_json::from_str(
            r#"{"name":"수능","targetDate":"2026-11-19","goalAmount":null}"#,
        )
        .unwrap();
        assert_eq!(req.target_date, "2026-11-19");
        assert!(req.goal_amount.is_none());
    }
}
