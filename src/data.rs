use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use csv::StringRecord;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::table::Table;
use crate::wealth::collapse::PercentChange;

pub const HOUSEHOLDS_COLUMN: &str = "us_total_households";
pub const YEAR_COLUMN: &str = "year";

#[derive(Debug, PartialEq, Error)]
pub enum DataError {
    #[error("could not locate header row with 'us_total_households' + 'year' within the first {lookahead} rows")]
    HeaderNotFound { lookahead: usize },
    #[error("missing column in source: {0}")]
    MissingColumn(String),
    #[error("invalid number '{value}' in column '{column}'")]
    InvalidNumber { column: String, value: String },
    #[error("invalid quarter date '{0}'")]
    InvalidDate(String),
}

/// Census rows below the located header, with normalized column names.
#[derive(Debug)]
pub struct CensusTable {
    /// Number of leading rows skipped before the header.
    pub header_offset: usize,
    pub columns: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl CensusTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Debug, Deserialize)]
pub struct AssetRecord {
    /// Quarter marker such as `1990:Q1`.
    pub date: String,
    pub category: String,
    /// Trillions of dollars.
    pub assets: Decimal,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PercentChangeRecord {
    pub tier: String,
    pub pct_change: Decimal,
}

impl From<&PercentChange> for PercentChangeRecord {
    fn from(change: &PercentChange) -> Self {
        PercentChangeRecord {
            tier: change.tier.per_household_column().to_string(),
            pct_change: change.pct_change,
        }
    }
}

fn normalize_column(column: &str) -> String {
    column.trim().to_lowercase()
}

pub fn load_census_csv(path: &Path, lookahead: usize) -> Result<CensusTable> {
    let file = File::open(path)?;
    read_census_csv(file, lookahead)
}

/// Probes header offsets `0..lookahead` and returns the rows below the first
/// candidate row naming both the household-count and the year column.
pub fn read_census_csv<R: Read>(reader: R, lookahead: usize) -> Result<CensusTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;

    for skip in 0..lookahead.min(records.len()) {
        let columns: Vec<String> = records[skip].iter().map(normalize_column).collect();
        let has_households = columns.iter().any(|column| column == HOUSEHOLDS_COLUMN);
        let has_year = columns.iter().any(|column| column == YEAR_COLUMN);

        if has_households && has_year {
            info!("census header found after skipping {} rows", skip);
            return Ok(CensusTable {
                header_offset: skip,
                columns,
                records: records[skip + 1..].to_vec(),
            });
        }

        debug!("no census header at offset {}, columns={:?}", skip, columns);
    }

    Err(DataError::HeaderNotFound { lookahead }.into())
}

pub fn load_assets(path: &Path) -> Result<Vec<AssetRecord>> {
    let file = File::open(path)?;
    read_assets(file)
}

pub fn read_assets<R: Read>(reader: R) -> Result<Vec<AssetRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut records = Vec::new();
    for record in csv_reader.deserialize::<AssetRecord>() {
        records.push(record?);
    }
    debug!("read {} quarterly asset records", records.len());

    Ok(records)
}

fn parse_cell(column: &str, value: &str) -> Result<Option<Decimal>, DataError> {
    if value.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map(Some)
        .map_err(|_| DataError::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
}

pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    read_table(file)
}

/// Reads a numeric CSV with a header row. Empty fields become missing cells.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(columns.clone());

    for record in csv_reader.records() {
        let record = record?;
        let row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, value)| parse_cell(column, value))
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(row)?;
    }

    Ok(table)
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}

pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    csv_writer.write_record(table.columns())?;
    for row in table.rows() {
        csv_writer.write_record(row.iter().map(|cell| match cell {
            Some(value) => value.to_string(),
            None => String::new(),
        }))?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn write_percent_changes(changes: &[PercentChange], path: &Path) -> Result<()> {
    create_parent_dir(path)?;

    let mut csv_writer = csv::WriterBuilder::new().from_path(path)?;
    for change in changes {
        let record: PercentChangeRecord = change.into();
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;

    Ok(())
}
