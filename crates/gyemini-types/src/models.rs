use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdayFavorite {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_date: NaiveDate,
    pub goal_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Board listing row; the body is only sent on the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub author_name: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorStat {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndex {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

/// Scheduled public offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ipo {
    pub id: u32,
    pub company_name: String,
    pub subscription_start: NaiveDate,
    pub subscription_end: NaiveDate,
    pub listing_date: NaiveDate,
    pub offering_price: u64,
    pub market: String,
    pub lead_underwriter: String,
    pub offering_shares: u64,
}
