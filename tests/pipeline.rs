use std::fs;
use std::path::Path;

use anyhow::Result;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use wealthgap::config::PipelineConfig;
use wealthgap::data::{self, DataError, PercentChangeRecord};
use wealthgap::pipeline::{run_collapse_pipeline, run_wealth_pipeline};
use wealthgap::wealth::WealthError;

const CENSUS: &str = "\
Table HH-1. Households by Type: 1940 to Present
(Numbers in thousands)
Source: Current Population Survey
Year,US_Total_Households,Family households
2023,\"125,000\",\"84,264\"
1991,\"100,000\",\"66,322\"
1990,\"100,000\",\"66,090\"
";

const ASSETS: &str = "\
date,category,assets,net_worth
1989:Q4,TopPt1,1.0,1.0
1990:Q1,TopPt1,2.0,1.9
1990:Q2,TopPt1,4.0,3.8
1990:Q1,RemainingTop1,9.0,8.0
1990:Q1,Next9,18.0,15.0
1990:Q1,Next40,20.0,15.0
1990:Q1,Bottom50,5.0,1.0
1991:Q1,TopPt1,3.0,2.9
1991:Q1,RemainingTop1,9.0,8.0
1991:Q1,Next9,18.0,15.0
1991:Q1,Next40,20.0,15.0
1991:Q1,Bottom50,5.0,1.0
2023:Q1,TopPt1,15.0,14.0
2023:Q1,RemainingTop1,18.0,16.0
2023:Q1,Next9,22.5,20.0
2023:Q1,Next40,25.0,20.0
2023:Q1,Bottom50,5.0,1.0
2024:Q1,TopPt1,99.0,98.0
";

fn workspace(census: &str, assets: &str) -> Result<(TempDir, PipelineConfig)> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("data"))?;
    fs::write(dir.path().join("data/014_census_household_data.csv"), census)?;
    fs::write(dir.path().join("data/014_federal_reserve_data.csv"), assets)?;

    let mut config = PipelineConfig::new(dir.path());
    config.set_render_charts(false);

    Ok((dir, config))
}

fn read_percent_changes(path: &Path) -> Result<Vec<PercentChangeRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

#[test]
fn test_wealth_pipeline_writes_per_household_result() -> Result<()> {
    let (_dir, config) = workspace(CENSUS, ASSETS)?;

    run_wealth_pipeline(&config)?;

    let result = data::load_table(&config.result_path())?;
    assert_eq!(
        result.columns(),
        &[
            "year",
            "top_pt1_per_household",
            "remaining_top_1_per_household",
            "next9_per_household",
            "next40_per_household",
            "bottom50_per_household",
        ]
    );
    assert_eq!(result.len(), 3);
    assert_eq!(
        result.rows()[0],
        vec![
            Some(dec!(1990)),
            Some(dec!(30)),
            Some(dec!(10)),
            Some(dec!(2)),
            Some(dec!(0.5)),
            Some(dec!(0.1)),
        ]
    );
    assert_eq!(result.rows()[2][1], Some(dec!(120)));

    Ok(())
}

#[test]
fn test_collapse_pipeline_reads_wealth_result() -> Result<()> {
    let (_dir, config) = workspace(CENSUS, ASSETS)?;

    run_wealth_pipeline(&config)?;
    run_collapse_pipeline(&config)?;

    let records = read_percent_changes(&config.pct_change_path())?;
    let expected = [
        ("top_pt1_per_household", dec!(300.0)),
        ("remaining_top_1_per_household", dec!(60.0)),
        ("next9_per_household", dec!(0.0)),
        ("next40_per_household", dec!(0.0)),
        ("bottom50_per_household", dec!(-20.0)),
    ];

    assert_eq!(records.len(), expected.len());
    for (record, (tier, pct_change)) in records.iter().zip(expected) {
        assert_eq!(record.tier, tier);
        assert_eq!(record.pct_change, pct_change);
    }

    Ok(())
}

#[test]
fn test_result_sets_use_fixed_decimal_places() -> Result<()> {
    let (_dir, config) = workspace(CENSUS, ASSETS)?;

    run_wealth_pipeline(&config)?;
    run_collapse_pipeline(&config)?;

    let per_household = fs::read_to_string(config.result_path())?;
    assert_eq!(
        per_household.lines().collect::<Vec<_>>(),
        vec![
            "year,top_pt1_per_household,remaining_top_1_per_household,next9_per_household,next40_per_household,bottom50_per_household",
            "1990,30.00,10.00,2.00,0.50,0.10",
            "1991,30.00,10.00,2.00,0.50,0.10",
            "2023,120.00,16.00,2.00,0.50,0.08",
        ]
    );

    let pct_change = fs::read_to_string(config.pct_change_path())?;
    assert_eq!(
        pct_change.lines().collect::<Vec<_>>(),
        vec![
            "tier,pct_change",
            "top_pt1_per_household,300.0",
            "remaining_top_1_per_household,60.0",
            "next9_per_household,0.0",
            "next40_per_household,0.0",
            "bottom50_per_household,-20.0",
        ]
    );

    Ok(())
}

#[test]
fn test_wealth_pipeline_is_idempotent() -> Result<()> {
    let (_dir, config) = workspace(CENSUS, ASSETS)?;

    run_wealth_pipeline(&config)?;
    let first = fs::read(config.result_path())?;
    run_wealth_pipeline(&config)?;
    let second = fs::read(config.result_path())?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_join_gap_fails_validation() -> Result<()> {
    let census = CENSUS.replace("2023,\"125,000\",\"84,264\"\n", "");
    let (_dir, config) = workspace(&census, ASSETS)?;

    let err = run_wealth_pipeline(&config).unwrap_err();

    assert_eq!(
        err.downcast_ref::<WealthError>(),
        Some(&WealthError::NullValues("top_pt1_per_household".to_string()))
    );
    assert!(!config.result_path().exists());

    Ok(())
}

#[test]
fn test_header_outside_lookahead_is_fatal() -> Result<()> {
    let (_dir, mut config) = workspace(CENSUS, ASSETS)?;
    config.set_header_lookahead(3);

    let err = run_wealth_pipeline(&config).unwrap_err();

    assert_eq!(
        err.downcast_ref::<DataError>(),
        Some(&DataError::HeaderNotFound { lookahead: 3 })
    );

    Ok(())
}

#[test]
fn test_collapse_requires_end_year() -> Result<()> {
    let (_dir, mut config) = workspace(CENSUS, ASSETS)?;
    config.set_end_year(1991);
    run_wealth_pipeline(&config)?;

    config.set_end_year(2023);
    let err = run_collapse_pipeline(&config).unwrap_err();

    assert_eq!(err.downcast_ref::<WealthError>(), Some(&WealthError::MissingYear(2023)));

    Ok(())
}

#[test]
fn test_pipelines_render_charts() -> Result<()> {
    let (_dir, mut config) = workspace(CENSUS, ASSETS)?;
    config.set_render_charts(true).set_rounding_precision(1);

    run_wealth_pipeline(&config)?;
    run_collapse_pipeline(&config)?;

    assert!(config.levels_chart_path().exists());
    assert!(config.pct_change_chart_path().exists());

    Ok(())
}
