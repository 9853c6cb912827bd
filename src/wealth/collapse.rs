use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{round_fixed, Tier, WealthError};
use crate::data::YEAR_COLUMN;
use crate::table::Table;

const PCT_CHANGE_PRECISION: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct PercentChange {
    pub tier: Tier,
    pub pct_change: Decimal,
}

/// `(end - start) / start * 100` for `column`, rounded to one decimal.
pub fn percent_change(column: &str, start: Decimal, end: Decimal) -> Result<Decimal, WealthError> {
    if start.is_zero() {
        return Err(WealthError::ZeroBaseline {
            column: column.to_string(),
        });
    }

    end.checked_sub(start)
        .and_then(|delta| delta.checked_div(start))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|pct| round_fixed(pct, PCT_CHANGE_PRECISION))
        .ok_or_else(|| WealthError::Overflow {
            column: column.to_string(),
        })
}

/// Change in per-household assets of every tier between `start_year` and
/// `end_year`, read from the persisted per-household result set.
pub fn compute_collapse(table: &Table, start_year: i32, end_year: i32) -> Result<Vec<PercentChange>, WealthError> {
    let start = table
        .find_row(YEAR_COLUMN, Decimal::from(start_year))?
        .ok_or(WealthError::MissingYear(start_year))?;
    let end = table
        .find_row(YEAR_COLUMN, Decimal::from(end_year))?
        .ok_or(WealthError::MissingYear(end_year))?;

    Tier::ALL
        .iter()
        .map(|&tier| {
            let column = tier.per_household_column();
            let index = table
                .column_index(column)
                .ok_or_else(|| WealthError::MissingColumn(column.to_string()))?;

            let (Some(start_value), Some(end_value)) = (start[index], end[index]) else {
                return Err(WealthError::NullValues(column.to_string()));
            };
            let pct_change = percent_change(column, start_value, end_value)?;

            Ok(PercentChange { tier, pct_change })
        })
        .collect()
}
