//! Shared domain types.
//!
//! These types are intentionally small and plain so they can be:
//!
//! - produced once per loaded file (records)
//! - recomputed cheaply on every interaction (series, forecasts)
//! - exported to CSV without extra conversion

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{AppError, ErrorKind};

/// Rows with a year before this are dropped during cleaning.
pub const MIN_HISTORICAL_YEAR: i32 = 2000;

/// Kilotons per megaton.
pub const KT_PER_MT: f64 = 1000.0;

/// Lower bound for the forecast start year.
pub const MIN_START_YEAR: i32 = 2024;
/// Lower bound for the forecast end year.
pub const MIN_END_YEAR: i32 = 2025;
/// Upper bound for both forecast years.
pub const MAX_FORECAST_YEAR: i32 = 2100;

pub const DEFAULT_START_YEAR: i32 = 2025;
pub const DEFAULT_END_YEAR: i32 = 2040;

/// A quadratic needs three points to be determined.
pub const MIN_FIT_POINTS: usize = 3;

/// One cleaned input row.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRecord {
    pub country: String,
    pub year: i32,
    /// Emissions in megatons (input kilotons / 1000).
    pub value_mt: f64,
}

/// A single `(year, emissions)` observation or prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value_mt: f64,
}

/// Which segment of the combined output a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesKind {
    Historical,
    Forecast,
}

impl SeriesKind {
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::Historical => "Historical",
            SeriesKind::Forecast => "Forecast",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-year summed emissions for one country, years unique and ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    pub country: String,
    pub points: Vec<YearValue>,
}

impl HistoricalSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last observed year.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.points.first()?.year, self.points.last()?.year))
    }
}

/// Predictions for every integer year of a [`ForecastRange`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub range: ForecastRange,
    pub points: Vec<YearValue>,
}

/// Validated, inclusive forecast range.
///
/// Invariant: `MIN_START_YEAR <= start < end <= MAX_FORECAST_YEAR` and
/// `end >= MIN_END_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRange {
    start: i32,
    end: i32,
}

impl ForecastRange {
    pub fn new(start: i32, end: i32) -> Result<Self, AppError> {
        if start >= end {
            return Err(AppError::new(
                ErrorKind::InvalidRange,
                "End year must be greater than start year.",
            ));
        }
        if !(MIN_START_YEAR..=MAX_FORECAST_YEAR).contains(&start) {
            return Err(AppError::new(
                ErrorKind::InvalidRange,
                format!("Start year must be within [{MIN_START_YEAR}, {MAX_FORECAST_YEAR}] (got {start})."),
            ));
        }
        if !(MIN_END_YEAR..=MAX_FORECAST_YEAR).contains(&end) {
            return Err(AppError::new(
                ErrorKind::InvalidRange,
                format!("End year must be within [{MIN_END_YEAR}, {MAX_FORECAST_YEAR}] (got {end})."),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of forecast years (inclusive on both ends).
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

impl Default for ForecastRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

/// One row of the exported CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "CO2 Emissions (Mt)")]
    pub value_mt: f64,
    #[serde(rename = "Type")]
    pub kind: SeriesKind,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// A run's selection as understood by the pipeline.
///
/// This is derived from CLI flags or the TUI controls.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub country: String,
    pub start_year: i32,
    pub end_year: i32,
}

/// Output options for the one-shot `forecast` command.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Directory for the export CSV; `None` disables the export.
    pub export_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rejects_start_not_before_end() {
        for (s, e) in [(2030, 2029), (2030, 2030), (2100, 2025)] {
            let err = ForecastRange::new(s, e).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRange, "({s}, {e})");
        }
    }

    #[test]
    fn range_rejects_out_of_bounds_years() {
        assert!(ForecastRange::new(2023, 2030).is_err());
        assert!(ForecastRange::new(2024, 2101).is_err());
    }

    #[test]
    fn range_len_is_inclusive() {
        let r = ForecastRange::new(2024, 2025).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.years().collect::<Vec<_>>(), vec![2024, 2025]);

        let d = ForecastRange::default();
        assert_eq!((d.start(), d.end()), (2025, 2040));
        assert_eq!(d.len(), 16);
    }

    #[test]
    fn year_span_of_empty_series_is_none() {
        let s = HistoricalSeries {
            country: "X".to_string(),
            points: Vec::new(),
        };
        assert!(s.year_span().is_none());
        assert!(s.is_empty());
    }
}
