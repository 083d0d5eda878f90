use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use gyemini_types::models::MarketIndex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::MarketClient;

/// ETF proxies quoted through GLOBAL_QUOTE, keyed by the index they track.
pub struct QuoteProxy {
    pub key: &'static str,
    pub ticker: &'static str,
    pub name: &'static str,
}

pub const QUOTE_PROXIES: &[QuoteProxy] = &[
    QuoteProxy { key: "^GSPC", ticker: "SPY", name: "S&P 500" },
    QuoteProxy { key: "^IXIC", ticker: "QQQ", name: "NASDAQ" },
    QuoteProxy { key: "^KS11", ticker: "EWY", name: "KOSPI" },
    QuoteProxy { key: "^TNX", ticker: "IEF", name: "US 10Y" },
    QuoteProxy { key: "^TYX", ticker: "TLT", name: "US 30Y" },
];

pub const USD_KRW_KEY: &str = "KRW=X";
pub const GOLD_KEY: &str = "GC=F";

#[derive(Debug, Deserialize)]
struct FxPayload {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<FxRate>,
}

#[derive(Debug, Deserialize)]
struct FxRate {
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: String,
}

#[derive(Debug, Deserialize)]
struct QuotePayload {
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoldSpot {
    price: f64,
}

impl MarketClient {
    /// Snapshot of every tracked index. A source that fails is logged and
    /// left out of the map.
    pub async fn market_indices(&self) -> BTreeMap<String, MarketIndex> {
        let mut indices = BTreeMap::new();

        match self.usd_krw().await {
            Ok(index) => {
                indices.insert(USD_KRW_KEY.to_string(), index);
            }
            Err(e) => warn!("USD/KRW fetch failed: {:#}", e),
        }

        match self.gold_spot().await {
            Ok(index) => {
                indices.insert(GOLD_KEY.to_string(), index);
            }
            Err(e) => warn!("Gold fetch failed: {:#}", e),
        }

        for (i, proxy) in QUOTE_PROXIES.iter().enumerate() {
            if i > 0 && !self.config.quote_delay.is_zero() {
                tokio::time::sleep(self.config.quote_delay).await;
            }

            match self.global_quote(proxy).await {
                Ok(index) => {
                    indices.insert(proxy.key.to_string(), index);
                }
                Err(e) => warn!("Quote {} fetch failed: {:#}", proxy.ticker, e),
            }
        }

        indices
    }

    async fn usd_krw(&self) -> Result<MarketIndex> {
        let request = self.http.get(&self.config.alpha_vantage_url).query(&[
            ("function", "CURRENCY_EXCHANGE_RATE"),
            ("from_currency", "USD"),
            ("to_currency", "KRW"),
            ("apikey", self.config.alpha_vantage_key.as_str()),
        ]);
        let payload: FxPayload = self.get_json(request).await?;
        let rate = payload
            .rate
            .ok_or_else(|| anyhow!("no exchange rate in response"))?;

        Ok(MarketIndex {
            symbol: USD_KRW_KEY.to_string(),
            name: "USD/KRW".to_string(),
            price: parse_number(&rate.exchange_rate)?,
            change: None,
            change_percent: None,
        })
    }

    async fn gold_spot(&self) -> Result<MarketIndex> {
        let spots: Vec<GoldSpot> = self.get_json(self.http.get(&self.config.gold_url)).await?;
        let spot = spots.first().ok_or_else(|| anyhow!("empty gold response"))?;

        Ok(MarketIndex {
            symbol: GOLD_KEY.to_string(),
            name: "Gold".to_string(),
            price: spot.price,
            change: None,
            change_percent: None,
        })
    }

    async fn global_quote(&self, proxy: &QuoteProxy) -> Result<MarketIndex> {
        debug!("Fetching quote {} for {}", proxy.ticker, proxy.key);
        let request = self.http.get(&self.config.alpha_vantage_url).query(&[
            ("function", "GLOBAL_QUOTE"),
            ("symbol", proxy.ticker),
            ("apikey", self.config.alpha_vantage_key.as_str()),
        ]);
        let payload: QuotePayload = self.get_json(request).await?;
        // Rate-limited responses carry a "Note" instead of the quote
        let quote = payload.quote.ok_or_else(|| anyhow!("no quote in response"))?;

        Ok(MarketIndex {
            symbol: proxy.key.to_string(),
            name: proxy.name.to_string(),
            price: parse_number(&quote.price)?,
            change: quote.change.as_deref().and_then(|c| parse_number(c).ok()),
            change_percent: quote
                .change_percent
                .as_deref()
                .and_then(|c| parse_number(c.trim_end_matches('%')).ok()),
        })
    }
}

fn parse_number(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("not a number: {:?}", raw))?;
    if !value.is_finite() {
        return Err(anyhow!("not a finite number: {:?}", raw));
    }
    Ok(value)
}
