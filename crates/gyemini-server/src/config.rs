use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use gyemini_market::MarketConfig;

/// Secrets that ship in docs and sample env files.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "changeme",
    "CHANGE_ME",
    "your-secret-here",
    "dev-secret-change-me",
];

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub token_secret: String,
    pub market: MarketConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token_secret = var("GYEMINI_TOKEN_SECRET").unwrap_or_default();
        if token_secret.trim().is_empty() || PLACEHOLDER_SECRETS.contains(&token_secret.as_str()) {
            bail!("GYEMINI_TOKEN_SECRET is unset or still a placeholder");
        }

        let host = var("GYEMINI_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("GYEMINI_PORT")
            .unwrap_or_else(|| "8788".into())
            .parse()
            .context("GYEMINI_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        let db_path = PathBuf::from(var("GYEMINI_DB_PATH").unwrap_or_else(|| "gyemini.db".into()));

        let defaults = MarketConfig::default();
        let quote_delay = match var("GYEMINI_QUOTE_DELAY_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse().context("GYEMINI_QUOTE_DELAY_MS must be milliseconds")?,
            ),
            None => defaults.quote_delay,
        };
        let market = MarketConfig {
            exchange_primary_url: var("GYEMINI_EXCHANGE_PRIMARY_URL")
                .unwrap_or(defaults.exchange_primary_url),
            exchange_fallback_url: var("GYEMINI_EXCHANGE_FALLBACK_URL")
                .unwrap_or(defaults.exchange_fallback_url),
            alpha_vantage_url: var("GYEMINI_ALPHA_VANTAGE_URL").unwrap_or(defaults.alpha_vantage_url),
            alpha_vantage_key: var("ALPHA_VANTAGE_KEY").unwrap_or(defaults.alpha_vantage_key),
            gold_url: var("GYEMINI_GOLD_URL").unwrap_or(defaults.gold_url),
            quote_delay,
        };

        Ok(Self {
            addr,
            db_path,
            token_secret,
            market,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("GYEMINI_TOKEN_SECRET", "a-real-secret-value")])).unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:8788");
        assert_eq!(config.db_path, PathBuf::from("gyemini.db"));
        assert_eq!(config.market.alpha_vantage_key, "demo");
        assert_eq!(config.market.quote_delay, Duration::from_millis(12_000));
    }

    #[test]
    fn placeholder_secret_is_fatal() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("GYEMINI_TOKEN_SECRET", "change-me")])).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("GYEMINI_TOKEN_SECRET", "a-real-secret-value"),
            ("GYEMINI_HOST", "127.0.0.1"),
            ("GYEMINI_PORT", "9000"),
            ("GYEMINI_QUOTE_DELAY_MS", "0"),
            ("ALPHA_VANTAGE_KEY", "KEY123"),
        ]))
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:9000");
        assert!(config.market.quote_delay.is_zero());
        assert_eq!(config.market.alpha_vantage_key, "KEY123");

        assert!(Config::from_lookup(lookup(&[
            ("GYEMINI_TOKEN_SECRET", "a-real-secret-value"),
            ("GYEMINI_PORT", "http"),
        ]))
        .is_err());
    }
}
