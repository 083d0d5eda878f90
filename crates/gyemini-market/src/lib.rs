/// Outbound market data.
///
/// Exchange rates come from a primary feed with one fallback, index quotes
/// from Alpha Vantage plus a gold spot feed, and the IPO calendar from a
/// built-in schedule.

pub mod exchange;
pub mod index;
pub mod ipo;

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const DEFAULT_EXCHANGE_PRIMARY_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const DEFAULT_EXCHANGE_FALLBACK_URL: &str = "https://api.frankfurter.app/latest?from=USD";
pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_GOLD_URL: &str = "https://api.metals.live/v1/spot/gold";

/// Alpha Vantage free tier allows five calls a minute.
pub const DEFAULT_QUOTE_DELAY: Duration = Duration::from_millis(12_000);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub exchange_primary_url: String,
    pub exchange_fallback_url: String,
    pub alpha_vantage_url: String,
    pub alpha_vantage_key: String,
    pub gold_url: String,
    pub quote_delay: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            exchange_primary_url: DEFAULT_EXCHANGE_PRIMARY_URL.to_string(),
            exchange_fallback_url: DEFAULT_EXCHANGE_FALLBACK_URL.to_string(),
            alpha_vantage_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
            alpha_vantage_key: "demo".to_string(),
            gold_url: DEFAULT_GOLD_URL.to_string(),
            quote_delay: DEFAULT_QUOTE_DELAY,
        }
    }
}

/// Shared HTTP client for every upstream feed.
#[derive(Debug, Clone)]
pub struct MarketClient {
    http: Client,
    config: MarketConfig,
}

impl MarketClient {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("gyemini/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http, config })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let resp = request.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}
