//! Trend fitting and forecasting.
//!
//! Responsibilities:
//!
//! - fit the quadratic trend to a historical series (`fitter`)
//! - evaluate it over the requested forecast window (`forecast`)

pub mod fitter;
pub mod forecast;

pub use fitter::*;
pub use forecast::*;
