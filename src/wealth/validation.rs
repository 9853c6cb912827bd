use log::info;
use rust_decimal::Decimal;

use super::{Tier, WealthError};
use crate::data::YEAR_COLUMN;
use crate::table::Table;

/// Columns of the persisted result set, in output order.
pub fn expected_columns() -> Vec<&'static str> {
    std::iter::once(YEAR_COLUMN)
        .chain(Tier::ALL.iter().map(Tier::per_household_column))
        .collect()
}

/// Hard gate before anything is charted or written: every expected column
/// must exist, be fully populated and hold no negative value.
pub fn validate_dataset(table: &Table) -> Result<(), WealthError> {
    for column in expected_columns() {
        if !table.has_column(column) {
            return Err(WealthError::MissingColumn(column.to_string()));
        }

        let cells: Vec<_> = table.column(column)?.collect();
        if cells.iter().any(Option::is_none) {
            return Err(WealthError::NullValues(column.to_string()));
        }
        if cells.iter().flatten().any(|value| *value < Decimal::ZERO) {
            return Err(WealthError::NegativeValues(column.to_string()));
        }
    }

    info!("dataset validation passed");

    Ok(())
}
