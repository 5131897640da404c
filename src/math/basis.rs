//! Polynomial basis for the trend regression.
//!
//! The design row for a (centered) regressor `x` is `[1, x, x², ..., x^d]`.
//!
//! Numerical notes:
//! - Raw calendar years make `x²` about `4·10⁶`, which squares the condition
//!   number of the design matrix. Callers shift years by their mean first
//!   (see [`center`]) and undo the shift when reporting coefficients.

/// Fill `out` with `[1, x, x², ...]`; the degree is `out.len() - 1`.
pub fn fill_poly_row(x: f64, out: &mut [f64]) {
    let mut p = 1.0;
    for slot in out.iter_mut() {
        *slot = p;
        p *= x;
    }
}

/// Evaluate `Σ coeffs[k] · x^k` (Horner).
pub fn eval_poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Mean of `xs`, or `0.0` for an empty slice.
pub fn center(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Expand quadratic coefficients fitted on `x = t - shift` into coefficients
/// of `t`, returned as `[c, b, a]` for `a·t² + b·t + c`.
pub fn unshift_quadratic(coeffs: [f64; 3], shift: f64) -> [f64; 3] {
    let [c0, c1, c2] = coeffs;
    [
        c0 - c1 * shift + c2 * shift * shift,
        c1 - 2.0 * c2 * shift,
        c2,
    ]
}
