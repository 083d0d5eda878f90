use serde::Serialize;

use crate::{CalcError, Result, require_finite};

/// Monthly statutory deductions for one annual-gross bracket, in won.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    annual: f64,
    pension: f64,
    health: f64,
    long_term_care: f64,
    employment: f64,
    income_tax: f64,
}

const fn bracket(
    annual: f64,
    pension: f64,
    health: f64,
    long_term_care: f64,
    employment: f64,
    income_tax: f64,
) -> Bracket {
    Bracket { annual, pension, health, long_term_care, employment, income_tax }
}

/// Simplified withholding table, 10M won steps.
const DEDUCTION_TABLE: [Bracket; 10] = [
    bracket(10_000_000.0, 5_192.0, 2_749.0, 1_906.0, 140.0, 0.0),
    bracket(20_000_000.0, 12_175.0, 5_874.0, 4_073.0, 300.0, 983.0),
    bracket(30_000_000.0, 20_972.0, 9_000.0, 6_240.0, 460.0, 3_611.0),
    bracket(40_000_000.0, 34_683.0, 12_124.0, 8_406.0, 620.0, 10_711.0),
    bracket(50_000_000.0, 51_196.0, 15_249.0, 10_573.0, 780.0, 20_357.0),
    bracket(60_000_000.0, 68_044.0, 18_375.0, 12_740.0, 940.0, 30_305.0),
    bracket(70_000_000.0, 87_293.0, 21_498.0, 14_906.0, 1_100.0, 42_439.0),
    bracket(80_000_000.0, 112_738.0, 24_579.0, 17_073.0, 1_259.0, 60_205.0),
    bracket(90_000_000.0, 135_930.0, 27_750.0, 19_240.0, 1_419.0, 76_754.0),
    bracket(100_000_000.0, 159_119.0, 30_874.0, 21_406.0, 1_579.0, 91_638.0),
];

/// Per-10M-won growth applied above the last bracket.
const EXTRAPOLATION_STEP: f64 = 10_000_000.0;
const EXTRAPOLATION_SLOPE: Bracket = bracket(0.0, 20_000.0, 3_400.0, 2_200.0, 160.0, 15_000.0);

/// Small/medium business youth reduction: 90% off income tax.
const SMALL_BUSINESS_TAX_SHARE: f64 = 0.1;
const LOCAL_TAX_SHARE: f64 = 0.1;

/// Upper bound on gross annual salary (1,000억 won). Extrapolated
/// deductions stay well inside `i64` below it.
pub const MAX_ANNUAL_SALARY: f64 = 100_000_000_000.0;

pub const REVERSE_TOLERANCE: f64 = 1_000.0;
pub const REVERSE_MAX_ITERATIONS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    pub annual_salary: f64,
    pub monthly: f64,
    pub national_pension: i64,
    pub health_insurance: i64,
    pub long_term_care: i64,
    pub employment_insurance: i64,
    pub income_tax: i64,
    pub local_income_tax: i64,
    pub original_income_tax: i64,
    pub original_local_income_tax: i64,
    pub is_small_business_applied: bool,
    pub total_deduction: i64,
    pub net_monthly_salary: f64,
    pub net_annual_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseEstimate {
    pub target_net_monthly: f64,
    pub estimated_annual: f64,
    pub iterations: u32,
    pub breakdown: SalaryBreakdown,
}

/// Gross annual salary to monthly take-home pay.
pub fn net_from_annual(annual: f64, small_business: bool) -> Result<SalaryBreakdown> {
    let annual = require_finite("annual salary", annual)?;
    if annual <= 0.0 {
        return Err(CalcError::InvalidInput("annual salary must be greater than zero".into()));
    }
    if annual > MAX_ANNUAL_SALARY {
        return Err(out_of_range());
    }
    Ok(breakdown(annual, small_business))
}

/// Estimate the contract salary that yields `target_net_monthly` after deductions.
///
/// Fixed-point iteration: the monthly residual is scaled to annual terms and
/// added to the estimate until it falls under [`REVERSE_TOLERANCE`].
pub fn annual_from_net(target_net_monthly: f64, small_business: bool) -> Result<ReverseEstimate> {
    let target = require_finite("monthly net salary", target_net_monthly)?;
    if target <= 0.0 {
        return Err(CalcError::InvalidInput("monthly net salary must be greater than zero".into()));
    }
    if target * 12.0 > MAX_ANNUAL_SALARY {
        return Err(out_of_range());
    }

    let mut estimate = target * 12.0;
    for iteration in 0..REVERSE_MAX_ITERATIONS {
        let current = breakdown(estimate, small_business);
        let diff = target - current.net_monthly_salary;

        if diff.abs() < REVERSE_TOLERANCE {
            return Ok(ReverseEstimate {
                target_net_monthly: target,
                estimated_annual: estimate,
                iterations: iteration + 1,
                breakdown: current,
            });
        }

        estimate += diff * 12.0;
        if estimate > MAX_ANNUAL_SALARY {
            return Err(out_of_range());
        }
    }

    Err(CalcError::NoConvergence { iterations: REVERSE_MAX_ITERATIONS })
}

fn out_of_range() -> CalcError {
    CalcError::InvalidInput("annual salary must not exceed 100,000,000,000 won".into())
}

fn breakdown(annual: f64, small_business: bool) -> SalaryBreakdown {
    let monthly = annual / 12.0;
    let base = lookup(annual);

    let original_income_tax = base.income_tax;
    let original_local_income_tax = round(original_income_tax as f64 * LOCAL_TAX_SHARE);

    let income_tax = if small_business {
        round(original_income_tax as f64 * SMALL_BUSINESS_TAX_SHARE)
    } else {
        original_income_tax
    };
    let local_income_tax = round(income_tax as f64 * LOCAL_TAX_SHARE);

    let total_deduction = base.pension
        + base.health
        + base.long_term_care
        + base.employment
        + income_tax
        + local_income_tax;
    let net_monthly_salary = monthly - total_deduction as f64;

    SalaryBreakdown {
        annual_salary: annual,
        monthly,
        national_pension: base.pension,
        health_insurance: base.health,
        long_term_care: base.long_term_care,
        employment_insurance: base.employment,
        income_tax,
        local_income_tax,
        original_income_tax,
        original_local_income_tax,
        is_small_business_applied: small_business,
        total_deduction,
        net_monthly_salary,
        net_annual_salary: net_monthly_salary * 12.0,
    }
}

struct Deductions {
    pension: i64,
    health: i64,
    long_term_care: i64,
    employment: i64,
    income_tax: i64,
}

fn lookup(annual: f64) -> Deductions {
    let first = DEDUCTION_TABLE[0];
    let last = DEDUCTION_TABLE[DEDUCTION_TABLE.len() - 1];

    if annual <= first.annual {
        let ratio = annual / first.annual;
        return combine(&first, &first, |base, _| base * ratio);
    }

    if annual >= last.annual {
        let extra = (annual - last.annual) / EXTRAPOLATION_STEP;
        return combine(&last, &EXTRAPOLATION_SLOPE, |base, slope| base + extra * slope);
    }

    let (lower, upper) = DEDUCTION_TABLE
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|(lower, upper)| annual >= lower.annual && annual <= upper.annual)
        .unwrap_or((DEDUCTION_TABLE[0], DEDUCTION_TABLE[1]));

    let ratio = (annual - lower.annual) / (upper.annual - lower.annual);
    combine(&lower, &upper, |lo, hi| lo + (hi - lo) * ratio)
}

fn combine(a: &Bracket, b: &Bracket, f: impl Fn(f64, f64) -> f64) -> Deductions {
    Deductions {
        pension: round(f(a.pension, b.pension)),
        health: round(f(a.health, b.health)),
        long_term_care: round(f(a.long_term_care, b.long_term_care)),
        employment: round(f(a.employment, b.employment)),
        income_tax: round(f(a.income_tax, b.income_tax)),
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_point_matches_exactly() {
        let b = net_from_annual(40_000_000.0, false).unwrap();
        assert_eq!(b.national_pension, 34_683);
        assert_eq!(b.health_insurance, 12_124);
        assert_eq!(b.long_term_care, 8_406);
        assert_eq!(b.employment_insurance, 620);
        assert_eq!(b.income_tax, 10_711);
        assert_eq!(b.local_income_tax, 1_071);
        assert_eq!(b.total_deduction, 34_683 + 12_124 + 8_406 + 620 + 10_711 + 1_071);
        let expected_net = 40_000_000.0 / 12.0 - b.total_deduction as f64;
        assert!((b.net_monthly_salary - expected_net).abs() < 1e-6);
        assert!((b.net_annual_salary - expected_net * 12.0).abs() < 1e-6);
    }

    #[test]
    fn interpolates_between_brackets() {
        let b = net_from_annual(35_000_000.0, false).unwrap();
        // halfway between 30M and 40M
        assert_eq!(b.national_pension, (20_972.0_f64 + (34_683.0 - 20_972.0) * 0.5).round() as i64);
        assert_eq!(b.income_tax, 7_161);
    }

    #[test]
    fn scales_below_first_bracket() {
        let b = net_from_annual(5_000_000.0, false).unwrap();
        assert_eq!(b.national_pension, 2_596);
        assert_eq!(b.health_insurance, 1_375);
        assert_eq!(b.income_tax, 0);
    }

    #[test]
    fn extrapolates_above_last_bracket() {
        let b = net_from_annual(120_000_000.0, false).unwrap();
        assert_eq!(b.national_pension, 159_119 + 40_000);
        assert_eq!(b.health_insurance, 30_874 + 6_800);
        assert_eq!(b.long_term_care, 21_406 + 4_400);
        assert_eq!(b.employment_insurance, 1_579 + 320);
        assert_eq!(b.income_tax, 91_638 + 30_000);
    }

    #[test]
    fn small_business_reduction_cuts_income_tax() {
        let b = net_from_annual(50_000_000.0, true).unwrap();
        assert!(b.is_small_business_applied);
        assert_eq!(b.original_income_tax, 20_357);
        assert_eq!(b.original_local_income_tax, 2_036);
        assert_eq!(b.income_tax, 2_036);
        assert_eq!(b.local_income_tax, 204);

        let full = net_from_annual(50_000_000.0, false).unwrap();
        assert!(b.net_monthly_salary > full.net_monthly_salary);
    }

    #[test]
    fn rejects_non_positive_input() {
        assert!(matches!(net_from_annual(0.0, false), Err(CalcError::InvalidInput(_))));
        assert!(matches!(net_from_annual(f64::NAN, false), Err(CalcError::InvalidInput(_))));
        assert!(matches!(annual_from_net(-1.0, false), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn rejects_salaries_past_the_ceiling() {
        assert!(net_from_annual(MAX_ANNUAL_SALARY, false).is_ok());
        for annual in [MAX_ANNUAL_SALARY + 1.0, 1e22, f64::MAX] {
            assert!(matches!(net_from_annual(annual, false), Err(CalcError::InvalidInput(_))));
        }
        assert!(matches!(annual_from_net(1e21, true), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn reverse_estimate_lands_within_tolerance() {
        for target in [1_500_000.0, 3_000_000.0, 5_500_000.0, 9_000_000.0] {
            for small_business in [false, true] {
                let est = annual_from_net(target, small_business).unwrap();
                let forward = net_from_annual(est.estimated_annual, small_business).unwrap();
                assert!(
                    (forward.net_monthly_salary - target).abs() < REVERSE_TOLERANCE,
                    "target {} -> {}",
                    target,
                    forward.net_monthly_salary
                );
                assert!(est.estimated_annual > target * 12.0);
                assert!(est.iterations <= REVERSE_MAX_ITERATIONS);
            }
        }
    }
}
