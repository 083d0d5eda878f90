use serde::{Deserialize, Serialize};

use crate::{CalcError, Result, require_finite};

/// Standard Korean withholding on interest income (14% + 1.4% local).
pub const DEFAULT_TAX_RATE: f64 = 15.4;

/// Longest term accepted, in years. Savings products sum one term per
/// contribution, so this also bounds the work per calculation.
pub const MAX_YEARS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodUnit {
    Years,
    Months,
    Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Lump-sum deposit (예금).
    #[default]
    Deposit,
    /// Same amount paid in every month (월납 적금).
    MonthlySavings,
    /// Same amount paid in every day (일납 적금).
    DailySavings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    #[default]
    Simple,
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestInput {
    /// Deposit principal, or the per-period contribution for savings products.
    pub amount: f64,
    /// Annual rate in percent.
    pub rate: f64,
    pub period: f64,
    pub period_unit: PeriodUnit,
    #[serde(default)]
    pub product: Product,
    #[serde(default)]
    pub compounding: Compounding,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestResult {
    pub product: Product,
    pub compounding: Compounding,
    /// Everything paid in over the term.
    pub principal: f64,
    pub interest_gross: f64,
    pub tax_amount: f64,
    pub interest_net: f64,
    pub total_gross: f64,
    pub total_net: f64,
    pub rate: f64,
    pub years: f64,
    pub tax_rate: f64,
}

pub fn calculate(input: &InterestInput) -> Result<InterestResult> {
    let amount = require_finite("amount", input.amount)?;
    let rate_pct = require_finite("rate", input.rate)?;
    let period = require_finite("period", input.period)?;
    let tax_pct = require_finite("tax rate", input.tax_rate)?;

    if amount <= 0.0 {
        return Err(CalcError::InvalidInput("amount must be greater than zero".into()));
    }
    if rate_pct < 0.0 {
        return Err(CalcError::InvalidInput("rate must not be negative".into()));
    }
    if period <= 0.0 {
        return Err(CalcError::InvalidInput("period must be greater than zero".into()));
    }
    if !(0.0..=100.0).contains(&tax_pct) {
        return Err(CalcError::InvalidInput("tax rate must be between 0 and 100".into()));
    }
    if input.compounding == Compounding::Annual && input.product != Product::Deposit {
        return Err(CalcError::InvalidInput(
            "annual compounding only applies to lump-sum deposits".into(),
        ));
    }

    let r = rate_pct / 100.0;
    let years = match input.period_unit {
        PeriodUnit::Years => period,
        PeriodUnit::Months => period / 12.0,
        PeriodUnit::Days => period / 365.0,
    };
    if years > MAX_YEARS {
        return Err(CalcError::InvalidInput(format!(
            "period must not exceed {} years",
            MAX_YEARS
        )));
    }

    let (principal, interest_gross) = match input.product {
        Product::Deposit => (amount, deposit_interest(amount, r, years, input.compounding)),
        Product::MonthlySavings => {
            let periods = years * 12.0;
            (amount * periods, savings_interest(amount, r / 12.0, periods, input.compounding))
        }
        Product::DailySavings => {
            let periods = years * 365.0;
            (amount * periods, savings_interest(amount, r / 365.0, periods, input.compounding))
        }
    };

    let tax_amount = interest_gross * tax_pct / 100.0;
    let interest_net = interest_gross - tax_amount;

    Ok(InterestResult {
        product: input.product,
        compounding: input.compounding,
        principal,
        interest_gross,
        tax_amount,
        interest_net,
        total_gross: principal + interest_gross,
        total_net: principal + interest_net,
        rate: rate_pct,
        years,
        tax_rate: tax_pct,
    })
}

fn deposit_interest(principal: f64, r: f64, years: f64, compounding: Compounding) -> f64 {
    match compounding {
        Compounding::Simple => principal * r * years,
        Compounding::Monthly => principal * (1.0 + r / 12.0).powf(years * 12.0) - principal,
        Compounding::Annual => principal * (1.0 + r).powf(years) - principal,
    }
}

/// Sum interest over every contribution; contribution `i` earns for
/// `periods - i` periods. A fractional final period still gets a contribution.
fn savings_interest(contribution: f64, period_rate: f64, periods: f64, compounding: Compounding) -> f64 {
    let mut interest = 0.0;
    let mut i = 0.0;
    while i < periods {
        let remaining = periods - i;
        interest += match compounding {
            Compounding::Simple => contribution * period_rate * remaining,
            _ => contribution * (1.0 + period_rate).powf(remaining) - contribution,
        };
        i += 1.0;
    }
    interest
}
