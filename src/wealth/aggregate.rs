use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::round_fixed;
use super::tier::{Tier, TierValues};
use crate::config::PipelineConfig;
use crate::data::{AssetRecord, CensusTable, DataError, HOUSEHOLDS_COLUMN, YEAR_COLUMN};
use crate::table::{Table, TableError};

/// The census reports households in thousands.
const HOUSEHOLD_UNIT: u64 = 1000;
/// Trillions to millions.
const ASSET_SCALE: Decimal = dec!(1000000);

/// Mean quarterly assets per tier for one year, in millions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualWealth {
    pub year: i32,
    pub assets: TierValues<Option<Decimal>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub year: i32,
    pub households: Option<u64>,
    pub assets: TierValues<Option<Decimal>>,
    pub per_household: TierValues<Option<Decimal>>,
}

pub fn parse_household_count(raw: &str) -> Result<u64, DataError> {
    let invalid = || DataError::InvalidNumber {
        column: HOUSEHOLDS_COLUMN.to_string(),
        value: raw.to_string(),
    };

    let thousands: u64 = raw.trim().replace(',', "").parse().map_err(|_| invalid())?;
    thousands.checked_mul(HOUSEHOLD_UNIT).ok_or_else(invalid)
}

pub fn parse_year(raw: &str) -> Result<i32, DataError> {
    raw.trim().parse().map_err(|_| DataError::InvalidNumber {
        column: YEAR_COLUMN.to_string(),
        value: raw.to_string(),
    })
}

/// Year of a quarter marker, taken from its first four characters.
pub fn date_year(date: &str) -> Result<i32, DataError> {
    date.get(..4)
        .and_then(|year| year.parse().ok())
        .ok_or_else(|| DataError::InvalidDate(date.to_string()))
}

/// Household count per year. The first row of a repeated year wins.
pub fn households_by_year(census: &CensusTable) -> Result<BTreeMap<i32, u64>, DataError> {
    let year_index = census
        .column_index(YEAR_COLUMN)
        .ok_or_else(|| DataError::MissingColumn(YEAR_COLUMN.to_string()))?;
    let households_index = census
        .column_index(HOUSEHOLDS_COLUMN)
        .ok_or_else(|| DataError::MissingColumn(HOUSEHOLDS_COLUMN.to_string()))?;

    let mut households = BTreeMap::new();
    for record in &census.records {
        let year = parse_year(record.get(year_index).unwrap_or_default())?;
        let count = parse_household_count(record.get(households_index).unwrap_or_default())?;

        if households.contains_key(&year) {
            warn!("duplicate census year {}, keeping first row", year);
            continue;
        }
        households.insert(year, count);
    }

    Ok(households)
}

/// Averages the quarterly records of each (year, tier) inside the configured
/// window and pivots the tiers into one row per year.
pub fn annual_wealth(records: &[AssetRecord], config: &PipelineConfig) -> Result<Vec<AnnualWealth>, DataError> {
    let mut totals: BTreeMap<(i32, Tier), (Decimal, u32)> = BTreeMap::new();
    let mut unknown = BTreeSet::new();

    for record in records {
        let year = date_year(&record.date)?;
        if !config.contains_year(year) {
            continue;
        }

        let Some(tier) = Tier::from_source_label(&record.category) else {
            unknown.insert(record.category.as_str());
            continue;
        };

        let (sum, quarters) = totals.entry((year, tier)).or_insert((Decimal::ZERO, 0));
        *sum += record.assets * ASSET_SCALE;
        *quarters += 1;
    }

    for label in unknown {
        warn!("ignoring unknown asset category '{}'", label);
    }

    let mut years: BTreeMap<i32, TierValues<Option<Decimal>>> = BTreeMap::new();
    for ((year, tier), (sum, quarters)) in totals {
        debug!("{} {:?}: averaging {} quarters", year, tier, quarters);
        years.entry(year).or_default()[tier] = Some(sum / Decimal::from(quarters));
    }

    Ok(years
        .into_iter()
        .map(|(year, assets)| AnnualWealth { year, assets })
        .collect())
}

/// Assets held by the average household of `tier`. Missing when there are no
/// households to divide by.
pub fn per_household(assets: Decimal, households: u64, tier: Tier) -> Option<Decimal> {
    assets.checked_div(Decimal::from(households) * tier.population_share())
}

/// Left join on year: every wealth row is kept, with a missing household
/// count when the census has no row for its year.
pub fn merge_households(wealth: Vec<AnnualWealth>, households: &BTreeMap<i32, u64>) -> Vec<MergedRow> {
    wealth
        .into_iter()
        .map(|annual| {
            let count = households.get(&annual.year).copied();
            if count.is_none() {
                warn!("no census household count for year {}", annual.year);
            }

            let figures = annual
                .assets
                .map(|tier, assets| per_household((*assets)?, count?, tier));

            MergedRow {
                year: annual.year,
                households: count,
                assets: annual.assets,
                per_household: figures,
            }
        })
        .collect()
}

pub fn round_row(row: &mut MergedRow, precision: u32) {
    row.assets = row.assets.map(|_, value| value.map(|value| round_fixed(value, precision)));
    row.per_household = row
        .per_household
        .map(|_, value| value.map(|value| round_fixed(value, precision)));
}

pub fn build_per_household(
    census: &CensusTable,
    assets: &[AssetRecord],
    config: &PipelineConfig,
) -> Result<Vec<MergedRow>, DataError> {
    let households = households_by_year(census)?;
    let wealth = annual_wealth(assets, config)?;

    let mut rows = merge_households(wealth, &households);
    for row in rows.iter_mut() {
        round_row(row, config.rounding_precision());
    }

    Ok(rows)
}

/// Flattens merged rows into named columns: year, household count, the
/// asset totals and the per-household figures.
pub fn to_table(rows: &[MergedRow]) -> Result<Table, TableError> {
    let columns = [YEAR_COLUMN, HOUSEHOLDS_COLUMN]
        .into_iter()
        .chain(Tier::ALL.iter().map(Tier::assets_column))
        .chain(Tier::ALL.iter().map(Tier::per_household_column));
    let mut table = Table::new(columns);

    for row in rows {
        let cells = [Some(Decimal::from(row.year)), row.households.map(Decimal::from)]
            .into_iter()
            .chain(row.assets.iter().map(|(_, value)| *value))
            .chain(row.per_household.iter().map(|(_, value)| *value))
            .collect();
        table.push_row(cells)?;
    }

    Ok(table)
}
