//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - combined historical/forecast CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
