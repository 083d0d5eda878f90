/// Gyemini calculators
///
/// Pure, synchronous routines behind every calculator in the app. Nothing in
/// this crate touches the network or the database; the API layer feeds it
/// parsed input and serializes whatever comes back.

pub mod currency;
pub mod dday;
pub mod interest;
pub mod salary;
pub mod units;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("cannot convert between {from} and {to}")]
    IncompatibleUnits { from: String, to: String },

    #[error("unsupported currency: {0}")]
    UnknownCurrency(String),

    #[error("salary estimate did not converge after {iterations} iterations")]
    NoConvergence { iterations: u32 },
}

pub type Result<T> = std::result::Result<T, CalcError>;

pub(crate) fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput(format!("{} must be a finite number", name)))
    }
}
