//! Reporting utilities: headings, tables, and run summaries.

pub mod format;

pub use format::*;
