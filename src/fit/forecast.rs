//! Forecast generation from a fitted trend.

use crate::domain::{ForecastRange, ForecastSeries, YearValue};
use crate::error::AppError;
use crate::models::QuadraticTrend;

/// Evaluate the trend at every integer year of `range`, ascending.
pub fn forecast(trend: &QuadraticTrend, range: ForecastRange) -> Result<ForecastSeries, AppError> {
    let mut points = Vec::with_capacity(range.len());
    for year in range.years() {
        let value_mt = trend.predict(year as f64);
        if !value_mt.is_finite() {
            return Err(AppError::runtime(format!(
                "Non-finite forecast value for year {year}."
            )));
        }
        points.push(YearValue { year, value_mt });
    }
    Ok(ForecastSeries { range, points })
}
