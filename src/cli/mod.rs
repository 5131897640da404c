//! Command-line parsing for the CO₂ forecast dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_END_YEAR, DEFAULT_START_YEAR, MAX_FORECAST_YEAR, MIN_END_YEAR, MIN_START_YEAR,
};

pub mod picker;

/// Environment variable (or `.env` entry) naming the default CSV file.
pub const CSV_ENV_VAR: &str = "CO2_FORECAST_CSV";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "co2", version, about = "Country-wise CO₂ emissions forecast (quadratic trend)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit and forecast one country, print tables and a chart, optionally export CSV.
    Forecast(ForecastArgs),
    /// List the countries present in a file after cleaning.
    Countries(FileArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same pipeline as `co2 forecast`, but renders results in a
    /// terminal UI using Ratatui and re-runs it on every control change.
    Tui(TuiArgs),
}

/// Input file selection shared by all commands.
#[derive(Debug, Args, Clone, Default)]
pub struct FileArgs {
    /// Emissions CSV (columns: country_name, year, value in kilotons).
    #[arg(short = 'f', long, value_name = "CSV", env = CSV_ENV_VAR)]
    pub file: Option<PathBuf>,
}

/// Options for a one-shot forecast.
#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Country to forecast (defaults to the first country in sorted order).
    #[arg(short = 'c', long)]
    pub country: Option<String>,

    /// First forecast year.
    #[arg(
        long,
        default_value_t = DEFAULT_START_YEAR,
        value_parser = clap::value_parser!(i32).range(MIN_START_YEAR as i64..=MAX_FORECAST_YEAR as i64)
    )]
    pub start: i32,

    /// Last forecast year (inclusive).
    #[arg(
        long,
        default_value_t = DEFAULT_END_YEAR,
        value_parser = clap::value_parser!(i32).range(MIN_END_YEAR as i64..=MAX_FORECAST_YEAR as i64)
    )]
    pub end: i32,

    /// Write `{country}_forecast_{start}_{end}.csv`.
    #[arg(long)]
    pub export: bool,

    /// Directory for the exported CSV.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the dashboard.
#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    #[command(flatten)]
    pub input: FileArgs,

    /// Write logs here (the dashboard owns the terminal, so stderr is unused).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_defaults() {
        let cli = Cli::try_parse_from(["co2", "forecast", "-f", "data.csv"]).unwrap();
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.start, 2025);
        assert_eq!(args.end, 2040);
        assert!(!args.export);
        assert_eq!(args.input.file, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn year_bounds_are_enforced_by_parser() {
        assert!(Cli::try_parse_from(["co2", "forecast", "--start", "2023"]).is_err());
        assert!(Cli::try_parse_from(["co2", "forecast", "--end", "2024"]).is_err());
        assert!(Cli::try_parse_from(["co2", "forecast", "--end", "2101"]).is_err());
        // Ordering is checked by the pipeline, not the parser.
        assert!(Cli::try_parse_from(["co2", "forecast", "--start", "2030", "--end", "2029"]).is_ok());
    }

    #[test]
    fn tui_accepts_log_file() {
        let cli = Cli::try_parse_from(["co2", "tui", "--log-file", "co2.log"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.log_file, Some(PathBuf::from("co2.log")));
    }
}
