//! `co2-forecast` library crate.
//!
//! The binary (`co2`) is a thin wrapper around this library so that:
//!
//! - the load → clean → aggregate → fit → forecast pipeline is testable without
//!   spawning processes or a terminal
//! - the CLI and the TUI share one implementation of every stage

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
