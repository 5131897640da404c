//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - loads and cleans the emissions CSV
//! - runs the forecast pipeline
//! - prints reports/plots and writes optional exports

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, FileArgs, ForecastArgs, TuiArgs};
use crate::data::EmissionsDataset;
use crate::domain::{ForecastConfig, OutputConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `co2` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may carry CO2_FORECAST_CSV; clap reads it through `env = ...`.
    dotenvy::dotenv().ok();

    // We want `co2` and `co2 -f data.csv` to behave like `co2 tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => {
            init_logging(None)?;
            handle_forecast(args)
        }
        Command::Countries(args) => {
            init_logging(None)?;
            handle_countries(args)
        }
        Command::Tui(args) => {
            if let Some(path) = &args.log_file {
                init_logging(Some(path))?;
            }
            handle_tui(args)
        }
    }
}

/// Initialize `env_logger`, honoring `RUST_LOG` (default level: warn).
///
/// With a path, log lines go to that file instead of stderr.
fn init_logging(path: Option<&Path>) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = path {
        let file = File::create(path)
            .map_err(|e| AppError::runtime(format!("Failed to create log file '{}': {e}", path.display())))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args.input)?;
    let config = forecast_config_from_args(&args, &dataset)?;
    let output = output_config_from_args(&args);

    let run = pipeline::run_forecast(&dataset, &config).inspect_err(|e| {
        log::warn!("forecast failed: {e}");
    })?;

    println!("{}", crate::report::format_run_summary(&dataset, &run));
    println!("{}", crate::report::format_tables(&run));

    if output.plot {
        let chart = crate::plot::render_ascii_chart(
            &crate::report::chart_title(run.country()),
            &run.historical.points,
            &run.forecast.points,
            output.plot_width,
            output.plot_height,
        );
        println!("{chart}");
    }

    if let Some(dir) = &output.export_dir {
        let path = crate::io::export::write_export(dir, &run.historical, &run.forecast)?;
        println!("Exported: {}", path.display());
    }

    Ok(())
}

fn handle_countries(args: FileArgs) -> Result<(), AppError> {
    let dataset = load_dataset(&args)?;
    print!("{}", crate::report::format_countries(&dataset));
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(args)
}

fn load_dataset(args: &FileArgs) -> Result<EmissionsDataset, AppError> {
    let path = resolve_csv_path(args)?;
    EmissionsDataset::load(&path)
}

/// Use `-f` / `CO2_FORECAST_CSV` when present, otherwise prompt.
fn resolve_csv_path(args: &FileArgs) -> Result<PathBuf, AppError> {
    match &args.file {
        Some(path) => crate::cli::picker::validate_csv_path(path),
        None => crate::cli::picker::prompt_for_csv_path(),
    }
}

/// Resolve the selection; the country defaults to the first one in sorted order.
pub fn forecast_config_from_args(args: &ForecastArgs, dataset: &EmissionsDataset) -> Result<ForecastConfig, AppError> {
    let country = match &args.country {
        Some(c) => c.trim().to_string(),
        None => dataset
            .countries()
            .first()
            .cloned()
            .ok_or_else(|| AppError::malformed("No countries found after cleaning."))?,
    };

    Ok(ForecastConfig {
        country,
        start_year: args.start,
        end_year: args.end,
    })
}

pub fn output_config_from_args(args: &ForecastArgs) -> OutputConfig {
    OutputConfig {
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_dir: args.export.then(|| args.out_dir.clone()),
    }
}

/// Rewrite argv so `co2` defaults to `co2 tui`.
///
/// Rules:
/// - `co2`                      -> `co2 tui`
/// - `co2 -f data.csv ...`      -> `co2 tui -f data.csv ...`
/// - `co2 --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "countries" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_emissions;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["co2"])), args(&["co2", "tui"]));
        assert_eq!(
            rewrite_args(args(&["co2", "-f", "x.csv"])),
            args(&["co2", "tui", "-f", "x.csv"])
        );
        assert_eq!(rewrite_args(args(&["co2", "--help"])), args(&["co2", "--help"]));
        assert_eq!(
            rewrite_args(args(&["co2", "forecast", "-c", "Peru"])),
            args(&["co2", "forecast", "-c", "Peru"])
        );
    }

    fn forecast_args(country: Option<&str>) -> ForecastArgs {
        ForecastArgs {
            input: FileArgs::default(),
            country: country.map(str::to_string),
            start: 2025,
            end: 2040,
            export: false,
            out_dir: PathBuf::from("."),
            no_plot: false,
            width: 80,
            height: 20,
        }
    }

    #[test]
    fn country_defaults_to_first_sorted() {
        let csv = "country_name,year,value\nZambia,2001,1\nAlbania,2001,1\n";
        let ds = EmissionsDataset::from_ingest(read_emissions(csv.as_bytes()).unwrap(), None);
        let cfg = forecast_config_from_args(&forecast_args(None), &ds).unwrap();
        assert_eq!(cfg.country, "Albania");

        let cfg = forecast_config_from_args(&forecast_args(Some(" Zambia ")), &ds).unwrap();
        assert_eq!(cfg.country, "Zambia");
    }

    #[test]
    fn empty_dataset_has_no_default_country() {
        let ds = EmissionsDataset::from_ingest(read_emissions("country_name,year,value\n".as_bytes()).unwrap(), None);
        assert!(forecast_config_from_args(&forecast_args(None), &ds).is_err());
    }

    #[test]
    fn export_dir_only_when_requested() {
        let mut a = forecast_args(None);
        assert!(output_config_from_args(&a).export_dir.is_none());
        a.export = true;
        assert_eq!(output_config_from_args(&a).export_dir, Some(PathBuf::from(".")));
    }
}
