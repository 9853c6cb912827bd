//! Charts of the two result sets, rendered as SVG files with [`plotters`].

use std::fs;
use std::path::Path;

use enum_dispatch::enum_dispatch;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use crate::wealth::aggregate::MergedRow;
use crate::wealth::collapse::PercentChange;
use crate::wealth::{Tier, TierValues};

const CHART_SIZE: (u32, u32) = (1200, 600);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Drawing(String),
    #[error("nothing to plot: {0}")]
    EmptyData(String),
    #[error("failed to create chart directory: {0}")]
    Io(#[from] std::io::Error),
}

fn drawing_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

#[enum_dispatch]
pub trait Render {
    fn render(&self, output_path: &Path) -> Result<(), ChartError>;
}

#[enum_dispatch(Render)]
pub enum Chart {
    WealthLevelsChart,
    PercentChangeChart,
}

fn level_color(tier: Tier) -> RGBColor {
    match tier {
        Tier::TopPt1 => RGBColor(0x1f, 0x77, 0xb4),
        Tier::RemainingTop1 => RGBColor(0xff, 0x7f, 0x0e),
        Tier::Next9 => RGBColor(0x2c, 0xa0, 0x2c),
        Tier::Next40 => RGBColor(0xd6, 0x27, 0x28),
        Tier::Bottom50 => RGBColor(0x94, 0x67, 0xbd),
    }
}

fn bar_color(tier: Tier) -> RGBColor {
    match tier {
        Tier::TopPt1 => RGBColor(0x2c, 0xa0, 0x2c),
        Tier::RemainingTop1 => RGBColor(0xff, 0x7f, 0x0e),
        Tier::Next9 => RGBColor(0xd6, 0x27, 0x28),
        Tier::Next40 => RGBColor(0x94, 0x67, 0xbd),
        Tier::Bottom50 => RGBColor(0x8c, 0x56, 0x4b),
    }
}

fn prepare_output(output_path: &Path) -> Result<(), ChartError> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}

/// Per-household assets of every tier against year, one line per tier.
pub struct WealthLevelsChart {
    start_year: i32,
    end_year: i32,
    series: TierValues<Vec<(i32, f64)>>,
}

impl WealthLevelsChart {
    pub fn new(rows: &[MergedRow], start_year: i32, end_year: i32) -> WealthLevelsChart {
        let series = TierValues::from_fn(|tier| {
            rows.iter()
                .filter_map(|row| Some((row.year, row.per_household[tier]?.to_f64()?)))
                .collect()
        });

        WealthLevelsChart {
            start_year,
            end_year,
            series,
        }
    }
}

impl Render for WealthLevelsChart {
    fn render(&self, output_path: &Path) -> Result<(), ChartError> {
        let points = || self.series.iter().flat_map(|(_, points)| points.iter());
        let (Some(first_year), Some(last_year)) = (
            points().map(|(year, _)| *year).min(),
            points().map(|(year, _)| *year).max(),
        ) else {
            return Err(ChartError::EmptyData("no per-household figures".to_string()));
        };
        let y_max = points().map(|(_, value)| *value).fold(0.0, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

        prepare_output(output_path)?;
        let root = SVGBackend::new(output_path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Household Wealth by Year ({} - {})", self.start_year, self.end_year),
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(first_year..last_year.max(first_year + 1), 0.0..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Assets per Household (in Millions of Dollars)")
            .x_label_formatter(&|year| year.to_string())
            .draw()
            .map_err(drawing_error)?;

        for (tier, points) in self.series.iter() {
            let color = level_color(tier);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)).point_size(4))
                .map_err(drawing_error)?
                .label(format!("{} per Household", tier.display_label()))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;

        Ok(())
    }
}

/// One bar per tier showing its percentage change over the analysis window.
pub struct PercentChangeChart {
    start_year: i32,
    end_year: i32,
    bars: Vec<(Tier, f64)>,
}

impl PercentChangeChart {
    pub fn new(changes: &[PercentChange], start_year: i32, end_year: i32) -> PercentChangeChart {
        let bars = changes
            .iter()
            .filter_map(|change| Some((change.tier, change.pct_change.to_f64()?)))
            .collect();

        PercentChangeChart {
            start_year,
            end_year,
            bars,
        }
    }
}

impl Render for PercentChangeChart {
    fn render(&self, output_path: &Path) -> Result<(), ChartError> {
        if self.bars.is_empty() {
            return Err(ChartError::EmptyData("no percent changes".to_string()));
        }

        let low = self.bars.iter().map(|(_, value)| *value).fold(0.0, f64::min);
        let high = self.bars.iter().map(|(_, value)| *value).fold(0.0, f64::max);
        let padding = ((high - low) * 0.1).max(1.0);
        let y_range = (if low < 0.0 { low - padding } else { 0.0 })..(high + padding);

        let labels: Vec<&str> = self.bars.iter().map(|(tier, _)| tier.display_label()).collect();
        let label_for = |x: &f64| {
            let slot = x.round();
            if (x - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).map(|label| label.to_string()).unwrap_or_default()
        };

        prepare_output(output_path)?;
        let root = SVGBackend::new(output_path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!(
                    "Wealth Collapse: How Much the Bottom 99.9% Has Lost Since {}",
                    self.start_year
                ),
                ("sans-serif", 24),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..(self.bars.len() as f64 - 0.5), y_range)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(self.bars.len())
            .x_label_formatter(&label_for)
            .y_desc(format!(
                "% Change in Average Assets per Household ({} -> {})",
                self.start_year, self.end_year
            ))
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(self.bars.iter().enumerate().map(|(slot, (tier, value))| {
                let x = slot as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value)], bar_color(*tier).filled())
            }))
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn rows() -> Vec<MergedRow> {
        [(1990, dec!(10.5)), (1991, dec!(12.25))]
            .into_iter()
            .map(|(year, value)| MergedRow {
                year,
                households: Some(100_000_000),
                assets: TierValues::default(),
                per_household: TierValues::from_fn(|_| Some(value)),
            })
            .collect()
    }

    #[test]
    fn test_render_levels_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("charts").join("levels.svg");

        let chart: Chart = WealthLevelsChart::new(&rows(), 1990, 1991).into();
        chart.render(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_render_percent_change_chart_with_negative_bars() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("collapse.svg");

        let changes: Vec<PercentChange> = Tier::ALL
            .iter()
            .zip([dec!(300.0), dec!(120.5), dec!(40.0), dec!(-12.3), dec!(-35.0)])
            .map(|(&tier, pct_change)| PercentChange { tier, pct_change })
            .collect();
        let chart: Chart = PercentChangeChart::new(&changes, 1990, 2023).into();
        chart.render(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_render_empty_levels_chart() {
        let dir = TempDir::new().unwrap();
        let chart = WealthLevelsChart::new(&[], 1990, 2023);

        assert!(matches!(
            chart.render(&dir.path().join("empty.svg")),
            Err(ChartError::EmptyData(_))
        ));
    }
}
