//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cleaned input rows (`EmissionRecord`)
//! - per-country series and forecasts (`HistoricalSeries`, `ForecastSeries`)
//! - the validated forecast window (`ForecastRange`) and its bounds
//! - export rows and run configuration

pub mod types;

pub use types::*;
