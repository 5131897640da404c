//! Quadratic trend model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given year (for OLS)
//! - predict emissions for a year given fitted coefficients (for forecasts/plots)

use crate::domain::FitQuality;
use crate::math::{eval_poly, fill_poly_row, unshift_quadratic};

/// Polynomial degree of the trend. Not configurable.
pub const TREND_DEGREE: usize = 2;

/// Number of coefficients (`1, x, x²`).
pub const TREND_COEFFS: usize = TREND_DEGREE + 1;

/// A fitted `value ≈ a·year² + b·year + c` curve.
///
/// Coefficients are stored for the centered regressor `x = year - year_shift`;
/// [`QuadraticTrend::raw_coefficients`] expands them back to calendar years.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticTrend {
    pub year_shift: f64,
    pub coeffs: [f64; TREND_COEFFS],
    pub quality: FitQuality,
}

impl QuadraticTrend {
    /// Predicted emissions (Mt) for `year`.
    pub fn predict(&self, year: f64) -> f64 {
        eval_poly(&self.coeffs, year - self.year_shift)
    }

    /// `(a, b, c)` of `a·year² + b·year + c`.
    pub fn raw_coefficients(&self) -> (f64, f64, f64) {
        let [c, b, a] = unshift_quadratic(self.coeffs, self.year_shift);
        (a, b, c)
    }
}

/// Fill a design row for `year` centered on `shift`.
///
/// The row includes the constant term first (intercept).
///
/// # Panics
/// Panics if `out` does not have length [`TREND_COEFFS`].
pub fn fill_design_row(year: f64, shift: f64, out: &mut [f64]) {
    assert_eq!(out.len(), TREND_COEFFS, "design row must hold {TREND_COEFFS} coefficients");
    fill_poly_row(year - shift, out);
}
