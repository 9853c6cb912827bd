use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::chart::{Chart, PercentChangeChart, Render, WealthLevelsChart};
use crate::config::PipelineConfig;
use crate::data;
use crate::table::Table;
use crate::wealth::collapse::{self, PercentChange};
use crate::wealth::{aggregate, validation};

const SAMPLE_ROWS: usize = 5;

fn resolved(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn render(chart: Chart, path: &Path) -> Result<()> {
    chart.render(path)?;
    info!("chart written to: {}", resolved(path).display());

    Ok(())
}

/// Joins household counts with quarterly tier assets, derives the
/// per-household figures, validates them and persists the result set.
pub fn run_wealth_pipeline(config: &PipelineConfig) -> Result<Table> {
    info!("base directory: {}", resolved(config.base_dir()).display());

    let census = data::load_census_csv(&config.census_path(), config.header_lookahead())?;
    info!("census columns actually read: {:?}", census.columns.iter().take(10).collect::<Vec<_>>());
    for record in census.records.iter().take(2) {
        info!("census row: {:?}", record);
    }

    let assets = data::load_assets(&config.assets_path())?;
    let rows = aggregate::build_per_household(&census, &assets, config)?;
    let merged = aggregate::to_table(&rows)?;

    validation::validate_dataset(&merged)?;

    if config.render_charts() {
        let chart = WealthLevelsChart::new(&rows, config.start_year(), config.end_year());
        render(chart.into(), &config.levels_chart_path())?;
    }

    let result = merged.select(&validation::expected_columns())?;
    let result_path = config.result_path();
    data::write_table(&result, &result_path)?;

    info!("result set written to: {}", resolved(&result_path).display());
    info!("merged data (first {} rows):\n{}", SAMPLE_ROWS, result.head(SAMPLE_ROWS));

    Ok(result)
}

/// Reads the persisted per-household result set and computes how much each
/// tier gained or lost between the first and the last year of the window.
pub fn run_collapse_pipeline(config: &PipelineConfig) -> Result<Vec<PercentChange>> {
    let table = data::load_table(&config.result_path())?;
    info!("loaded result set (first {} rows):\n{}", SAMPLE_ROWS, table.head(SAMPLE_ROWS));

    let changes = collapse::compute_collapse(&table, config.start_year(), config.end_year())?;

    let pct_change_path = config.pct_change_path();
    data::write_percent_changes(&changes, &pct_change_path)?;
    info!("percent change result set written to: {}", resolved(&pct_change_path).display());

    for change in &changes {
        info!("{:<32}{:>10}", change.tier.per_household_column(), change.pct_change);
    }

    if config.render_charts() {
        let chart = PercentChangeChart::new(&changes, config.start_year(), config.end_year());
        render(chart.into(), &config.pct_change_chart_path())?;
    }

    Ok(changes)
}
