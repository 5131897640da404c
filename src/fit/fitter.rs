//! Least-squares calibration of the quadratic trend.
//!
//! Given a historical series `(year_i, y_i)` we:
//! - center years on their mean
//! - build the `[1, x, x²]` design matrix
//! - solve OLS by SVD
//! - compute SSE / RMSE / R² over the historical points

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, HistoricalSeries, MIN_FIT_POINTS};
use crate::error::{AppError, ErrorKind};
use crate::math::{center, solve_least_squares};
use crate::models::{QuadraticTrend, TREND_COEFFS, fill_design_row};

/// Fit a quadratic trend to the historical series.
///
/// Fewer than [`MIN_FIT_POINTS`] points is an `InsufficientData` error rather
/// than a degenerate curve.
pub fn fit_quadratic(series: &HistoricalSeries) -> Result<QuadraticTrend, AppError> {
    let n = series.len();
    if n < MIN_FIT_POINTS {
        return Err(AppError::new(
            ErrorKind::InsufficientData,
            format!(
                "Not enough historical data for '{}': {n} year(s) available, at least {MIN_FIT_POINTS} required for a quadratic fit.",
                series.country
            ),
        ));
    }

    let years: Vec<f64> = series.points.iter().map(|p| p.year as f64).collect();
    let y_obs: Vec<f64> = series.points.iter().map(|p| p.value_mt).collect();
    let shift = center(&years);

    let mut data = Vec::with_capacity(n * TREND_COEFFS);
    let mut row = [0.0; TREND_COEFFS];
    for &year in &years {
        fill_design_row(year, shift, &mut row);
        data.extend_from_slice(&row);
    }
    let x = DMatrix::from_row_slice(n, TREND_COEFFS, &data);
    let y = DVector::from_column_slice(&y_obs);

    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::runtime(format!(
            "Least-squares solve failed for '{}' (ill-conditioned design matrix).",
            series.country
        ))
    })?;

    let trend = QuadraticTrend {
        year_shift: shift,
        coeffs: [beta[0], beta[1], beta[2]],
        quality: FitQuality {
            sse: 0.0,
            rmse: 0.0,
            r_squared: 0.0,
            n,
        },
    };
    let quality = fit_quality(&trend, &years, &y_obs)?;

    log::debug!(
        "fitted quadratic for '{}': n={n} shift={shift:.1} coeffs={:?} rmse={:.6}",
        series.country,
        trend.coeffs,
        quality.rmse
    );

    Ok(QuadraticTrend { quality, ..trend })
}

fn fit_quality(trend: &QuadraticTrend, years: &[f64], y_obs: &[f64]) -> Result<FitQuality, AppError> {
    let n = y_obs.len();
    let mean = center(y_obs);

    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&year, &y) in years.iter().zip(y_obs) {
        let y_fit = trend.predict(year);
        if !y_fit.is_finite() {
            return Err(AppError::runtime("Non-finite model prediction during fit diagnostics."));
        }
        sse += (y - y_fit).powi(2);
        sst += (y - mean).powi(2);
    }

    let rmse = (sse / n as f64).sqrt();
    // Constant data fitted exactly counts as a perfect fit.
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Ok(FitQuality {
        sse,
        rmse,
        r_squared,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearValue;

    fn series(points: &[(i32, f64)]) -> HistoricalSeries {
        HistoricalSeries {
            country: "CountryX".to_string(),
            points: points
                .iter()
                .map(|&(year, value_mt)| YearValue { year, value_mt })
                .collect(),
        }
    }

    #[test]
    fn fit_reproduces_exact_quadratic() {
        let f = |y: i32| {
            let t = (y - 2000) as f64;
            0.02 * t * t - 0.3 * t + 5.0
        };
        let s = series(&(2000..2020).map(|y| (y, f(y))).collect::<Vec<_>>());
        let trend = fit_quadratic(&s).unwrap();

        for year in [2000, 2010, 2019, 2030, 2100] {
            let p = trend.predict(year as f64);
            assert!((p - f(year)).abs() < 1e-6, "year={year}: {p} vs {}", f(year));
        }
        assert!(trend.quality.sse < 1e-12);
        assert!((trend.quality.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_four_point_example() {
        let s = series(&[(2000, 1.0), (2001, 2.0), (2002, 2.5), (2003, 3.0)]);
        let trend = fit_quadratic(&s).unwrap();

        assert!((trend.year_shift - 2001.5).abs() < 1e-12);
        assert!((trend.coeffs[0] - 2.28125).abs() < 1e-9);
        assert!((trend.coeffs[1] - 0.65).abs() < 1e-9);
        assert!((trend.coeffs[2] + 0.125).abs() < 1e-9);
        assert!((trend.predict(2024.0) + 46.375).abs() < 1e-6);
        assert!((trend.predict(2025.0) + 51.475).abs() < 1e-6);
        assert_eq!(trend.quality.n, 4);
        assert!(trend.quality.r_squared > 0.9 && trend.quality.r_squared < 1.0);
    }

    #[test]
    fn fit_requires_three_points() {
        for pts in [vec![], vec![(2000, 1.0)], vec![(2000, 1.0), (2001, 2.0)]] {
            let err = fit_quadratic(&series(&pts)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InsufficientData);
        }
    }

    #[test]
    fn fit_three_points_interpolates() {
        let s = series(&[(2010, 4.0), (2011, 1.0), (2012, 6.0)]);
        let trend = fit_quadratic(&s).unwrap();
        for p in &s.points {
            assert!((trend.predict(p.year as f64) - p.value_mt).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_series_is_perfect_fit() {
        let s = series(&[(2000, 7.0), (2001, 7.0), (2002, 7.0), (2003, 7.0)]);
        let trend = fit_quadratic(&s).unwrap();
        assert!((trend.predict(2050.0) - 7.0).abs() < 1e-9);
        assert_eq!(trend.quality.r_squared, 1.0);
    }
}
