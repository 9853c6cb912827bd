use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters, Setters};

const DEFAULT_ROUNDING_PRECISION: u32 = 2;
const DEFAULT_HEADER_LOOKAHEAD: usize = 15;

/// Locations and knobs shared by both pipelines.
///
/// Every path is resolved against `base_dir`, so a run never depends on the
/// directory the process happens to be started from.
#[derive(Debug, Clone, Getters, CopyGetters, Setters)]
pub struct PipelineConfig {
    #[getset(get = "pub", set = "pub")]
    base_dir: PathBuf,
    #[getset(get = "pub", set = "pub")]
    census_file: PathBuf,
    #[getset(get = "pub", set = "pub")]
    assets_file: PathBuf,
    #[getset(get = "pub", set = "pub")]
    result_dir: PathBuf,
    #[getset(get = "pub", set = "pub")]
    result_file: String,
    #[getset(get = "pub", set = "pub")]
    pct_change_file: String,
    #[getset(get = "pub", set = "pub")]
    levels_chart_file: String,
    #[getset(get = "pub", set = "pub")]
    pct_change_chart_file: String,
    #[getset(get_copy = "pub", set = "pub")]
    header_lookahead: usize,
    #[getset(get_copy = "pub", set = "pub")]
    start_year: i32,
    #[getset(get_copy = "pub", set = "pub")]
    end_year: i32,
    #[getset(get_copy = "pub", set = "pub")]
    rounding_precision: u32,
    #[getset(get_copy = "pub", set = "pub")]
    render_charts: bool,
}

impl PipelineConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> PipelineConfig {
        PipelineConfig {
            base_dir: base_dir.into(),
            census_file: Path::new("data").join("014_census_household_data.csv"),
            assets_file: Path::new("data").join("014_federal_reserve_data.csv"),
            result_dir: PathBuf::from("result_set"),
            result_file: "014_result_set.csv".to_string(),
            pct_change_file: "015_result_set.csv".to_string(),
            levels_chart_file: "014_household_wealth.svg".to_string(),
            pct_change_chart_file: "015_wealth_collapse.svg".to_string(),
            header_lookahead: DEFAULT_HEADER_LOOKAHEAD,
            start_year: 1990,
            end_year: 2023,
            rounding_precision: DEFAULT_ROUNDING_PRECISION,
            render_charts: true,
        }
    }

    pub fn census_path(&self) -> PathBuf {
        self.base_dir.join(&self.census_file)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.base_dir.join(&self.assets_file)
    }

    pub fn result_dir_path(&self) -> PathBuf {
        self.base_dir.join(&self.result_dir)
    }

    pub fn result_path(&self) -> PathBuf {
        self.result_dir_path().join(&self.result_file)
    }

    pub fn pct_change_path(&self) -> PathBuf {
        self.result_dir_path().join(&self.pct_change_file)
    }

    pub fn levels_chart_path(&self) -> PathBuf {
        self.result_dir_path().join(&self.levels_chart_file)
    }

    pub fn pct_change_chart_path(&self) -> PathBuf {
        self.result_dir_path().join(&self.pct_change_chart_file)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::new(".")
    }
}
