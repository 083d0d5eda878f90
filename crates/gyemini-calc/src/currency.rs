use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CalcError, Result, require_finite};

pub const BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "KRW", name: "대한민국 원", symbol: "₩" },
    Currency { code: "USD", name: "미국 달러", symbol: "$" },
    Currency { code: "EUR", name: "유로", symbol: "€" },
    Currency { code: "JPY", name: "일본 엔", symbol: "¥" },
    Currency { code: "CNY", name: "중국 위안", symbol: "¥" },
    Currency { code: "GBP", name: "영국 파운드", symbol: "£" },
    Currency { code: "AUD", name: "호주 달러", symbol: "A$" },
    Currency { code: "CAD", name: "캐나다 달러", symbol: "C$" },
    Currency { code: "CHF", name: "스위스 프랑", symbol: "Fr" },
    Currency { code: "HKD", name: "홍콩 달러", symbol: "HK$" },
    Currency { code: "SGD", name: "싱가포르 달러", symbol: "S$" },
    Currency { code: "THB", name: "태국 바트", symbol: "฿" },
    Currency { code: "VND", name: "베트남 동", symbol: "₫" },
];

pub fn find(code: &str) -> Result<&'static Currency> {
    let code = code.trim().to_ascii_uppercase();
    CURRENCIES
        .iter()
        .find(|c| c.code == code)
        .ok_or(CalcError::UnknownCurrency(code))
}

/// Rates quoted as units of each currency per one USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub rates: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub from: &'static str,
    pub to: &'static str,
    pub amount: f64,
    pub converted: f64,
    /// Units of `to` per one unit of `from`.
    pub rate: f64,
}

impl RateTable {
    pub fn new(mut rates: HashMap<String, f64>) -> Self {
        rates.entry(BASE_CURRENCY.to_string()).or_insert(1.0);
        Self { rates }
    }

    fn rate(&self, code: &str) -> Result<f64> {
        match self.rates.get(code) {
            Some(&r) if r.is_finite() && r > 0.0 => Ok(r),
            Some(_) => Err(CalcError::InvalidInput(format!("invalid rate for {}", code))),
            None => Err(CalcError::UnknownCurrency(code.to_string())),
        }
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Exchange> {
        let amount = require_finite("amount", amount)?;
        if amount <= 0.0 {
            return Err(CalcError::InvalidInput("amount must be greater than zero".into()));
        }

        let from = find(from)?;
        let to = find(to)?;

        let converted = if from.code == BASE_CURRENCY {
            amount * self.rate(to.code)?
        } else if to.code == BASE_CURRENCY {
            amount / self.rate(from.code)?
        } else {
            amount / self.rate(from.code)? * self.rate(to.code)?
        };

        Ok(Exchange {
            from: from.code,
            to: to.code,
            amount,
            converted,
            rate: converted / amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        RateTable::new(HashMap::from([
            ("KRW".to_string(), 1380.5),
            ("EUR".to_string(), 0.92),
            ("JPY".to_string(), 151.3),
        ]))
    }

    #[test]
    fn usd_is_implied() {
        let t = table();
        let ex = t.convert(10.0, "USD", "USD").unwrap();
        assert_eq!(ex.converted, 10.0);
    }

    #[test]
    fn direct_and_cross_rates() {
        let t = table();
        assert!((t.convert(2.0, "USD", "KRW").unwrap().converted - 2761.0).abs() < 1e-9);
        assert!((t.convert(1380.5, "krw", "usd").unwrap().converted - 1.0).abs() < 1e-12);

        let cross = t.convert(100.0, "EUR", "JPY").unwrap();
        assert!((cross.converted - 100.0 / 0.92 * 151.3).abs() < 1e-9);
        assert!((cross.rate - 151.3 / 0.92).abs() < 1e-9);
    }

    #[test]
    fn round_trip_returns_original_amount() {
        let t = table();
        for (from, to) in [("KRW", "EUR"), ("USD", "JPY"), ("JPY", "KRW")] {
            let there = t.convert(12_345.67, from, to).unwrap();
            let back = t.convert(there.converted, to, from).unwrap();
            assert!((back.converted - 12_345.67).abs() < 1e-6, "{} -> {}", from, to);
        }
    }

    #[test]
    fn unknown_or_missing_rates_fail() {
        let t = table();
        assert!(matches!(t.convert(1.0, "USD", "XYZ"), Err(CalcError::UnknownCurrency(_))));
        // Catalog currency with no rate in the table
        assert!(matches!(t.convert(1.0, "USD", "THB"), Err(CalcError::UnknownCurrency(_))));
        assert!(t.convert(0.0, "USD", "KRW").is_err());
    }
}
