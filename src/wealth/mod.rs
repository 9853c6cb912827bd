use rust_decimal::Decimal;
use thiserror::Error;

use crate::table::TableError;

pub mod aggregate;
pub mod collapse;
pub mod tier;
pub mod validation;


pub use tier::{Tier, TierValues};

#[derive(Debug, PartialEq, Error)]
pub enum WealthError {
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("null values in column: {0}")]
    NullValues(String),
    #[error("negative values in column: {0}")]
    NegativeValues(String),
    #[error("no row for year {0}")]
    MissingYear(i32),
    #[error("undefined percent change for {column}: starting value is zero")]
    ZeroBaseline { column: String },
    #[error("percent change for {column} is out of range")]
    Overflow { column: String },
    #[error("{0}")]
    Table(#[from] TableError),
}

/// Rounds half to even and pads to exactly `precision` decimal places, so
/// written values share one format.
pub fn round_fixed(value: Decimal, precision: u32) -> Decimal {
    let mut rounded = value.round_dp(precision);
    rounded.rescale(precision);
    rounded
}
