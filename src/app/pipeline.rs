//! Shared forecast pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate range -> aggregate -> fit -> forecast -> combined rows
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::EmissionsDataset;
use crate::domain::{CombinedRow, ForecastConfig, ForecastRange, ForecastSeries, HistoricalSeries};
use crate::error::AppError;
use crate::fit::{fit_quadratic, forecast};
use crate::io::export::combined_rows;
use crate::models::QuadraticTrend;

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub historical: HistoricalSeries,
    pub trend: QuadraticTrend,
    pub forecast: ForecastSeries,
    pub combined: Vec<CombinedRow>,
}

impl RunOutput {
    pub fn country(&self) -> &str {
        &self.historical.country
    }

    pub fn range(&self) -> ForecastRange {
        self.forecast.range
    }
}

/// Execute the full pipeline for one selection.
///
/// The range is validated before any aggregation or fitting happens, so an
/// invalid range never produces partial output.
pub fn run_forecast(dataset: &EmissionsDataset, config: &ForecastConfig) -> Result<RunOutput, AppError> {
    // 1) Validate the requested window.
    let range = ForecastRange::new(config.start_year, config.end_year)?;

    // 2) Aggregate the selected country.
    let historical = dataset.historical(&config.country);

    // 3) Fit the trend and evaluate it over the window.
    let trend = fit_quadratic(&historical)?;
    let forecast = forecast(&trend, range)?;

    // 4) Combined rows for export.
    let combined = combined_rows(&historical, &forecast);

    log::info!(
        "forecast '{}' {}-{}: {} historical point(s), {} forecast year(s)",
        config.country,
        range.start(),
        range.end(),
        historical.len(),
        forecast.points.len()
    );

    Ok(RunOutput {
        historical,
        trend,
        forecast,
        combined,
    })
}
