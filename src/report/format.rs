//! Formatted terminal output for the one-shot CLI commands.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::data::EmissionsDataset;
use crate::domain::YearValue;

pub const COL_YEAR: &str = "Year";
pub const COL_EMISSIONS: &str = "CO2 Emissions (Mt)";

pub fn historical_heading() -> String {
    "Historical Data".to_string()
}

pub fn forecast_heading(start_year: i32, end_year: i32) -> String {
    format!("Forecasted CO₂ Emissions ({start_year}–{end_year})")
}

pub fn chart_title(country: &str) -> String {
    format!("{country} CO₂ Emissions Forecast")
}

/// Format the run summary (dataset + selection + fitted trend).
pub fn format_run_summary(dataset: &EmissionsDataset, run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== co2 - Country-wise CO₂ Emissions Forecast ===\n");
    out.push_str(&format!(
        "File: {} | rows kept {} of {} | countries: {}\n",
        dataset.source_label(),
        dataset.stats.rows_used,
        dataset.stats.rows_read,
        dataset.countries().len()
    ));
    out.push_str(&format!("Country: {}\n", run.country()));
    out.push_str(&format!(
        "Forecast: {}-{} ({} years)\n",
        run.range().start(),
        run.range().end(),
        run.range().len()
    ));
    match run.historical.year_span() {
        Some((first, last)) => out.push_str(&format!(
            "History: n={} | years=[{first}, {last}]\n",
            run.historical.len()
        )),
        None => out.push_str("History: n=0\n"),
    }

    let (a, b, c) = run.trend.raw_coefficients();
    out.push_str("\nTrend (Mt):\n");
    out.push_str(&format!("- value = {a:.6e}·year² + {b:.6e}·year + {c:.6e}\n"));
    out.push_str(&format!(
        "- rmse={:.4} | r²={:.4} | sse={:.4}\n",
        run.trend.quality.rmse, run.trend.quality.r_squared, run.trend.quality.sse
    ));
    out.push('\n');

    out
}

/// Format both tables with their headings.
pub fn format_tables(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str(&historical_heading());
    out.push('\n');
    out.push_str(&format_table(&run.historical.points));
    out.push('\n');

    out.push_str(&forecast_heading(run.range().start(), run.range().end()));
    out.push('\n');
    out.push_str(&format_table(&run.forecast.points));

    out
}

/// Two-column `Year | CO2 Emissions (Mt)` table.
pub fn format_table(rows: &[YearValue]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{COL_YEAR:>6} {COL_EMISSIONS:>20}\n"));
    out.push_str(&format!("{:->6} {:->20}\n", "", ""));
    for r in rows {
        out.push_str(&format!("{:>6} {}\n", r.year, fmt_mt(r.value_mt)));
    }
    out
}

/// Right-aligned emissions value for tables.
pub fn fmt_mt(v: f64) -> String {
    format!("{v:>20.3}")
}

/// Format the `countries` command output.
pub fn format_countries(dataset: &EmissionsDataset) -> String {
    let mut out = String::new();
    if dataset.countries().is_empty() {
        out.push_str("No countries found after cleaning.\n");
        return out;
    }
    for c in dataset.countries() {
        let n = dataset.historical(c).len();
        out.push_str(&format!("{c} ({n} year(s))\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_forecast;
    use crate::domain::ForecastConfig;
    use crate::io::ingest::read_emissions;

    fn run() -> (EmissionsDataset, RunOutput) {
        let csv = "country_name,year,value\nX,2000,1000\nX,2001,2000\nX,2002,2500\nX,2003,3000\n";
        let ds = EmissionsDataset::from_ingest(read_emissions(csv.as_bytes()).unwrap(), None);
        let cfg = ForecastConfig {
            country: "X".to_string(),
            start_year: 2024,
            end_year: 2025,
        };
        let out = run_forecast(&ds, &cfg).unwrap();
        (ds, out)
    }

    #[test]
    fn headings() {
        assert_eq!(forecast_heading(2025, 2040), "Forecasted CO₂ Emissions (2025–2040)");
        assert_eq!(chart_title("India"), "India CO₂ Emissions Forecast");
    }

    #[test]
    fn tables_list_every_row() {
        let (_, out) = run();
        let text = format_tables(&out);
        assert!(text.starts_with("Historical Data\n"));
        assert!(text.contains("  2003                3.000"));
        assert!(text.contains("  2024              -46.375"));
        // 2 headings + 2×2 header lines + 4 + 2 rows + 1 blank line
        assert_eq!(text.lines().count(), 2 + 4 + 6 + 1);
    }

    #[test]
    fn summary_mentions_selection() {
        let (ds, out) = run();
        let text = format_run_summary(&ds, &out);
        assert!(text.contains("Country: X"));
        assert!(text.contains("Forecast: 2024-2025 (2 years)"));
        assert!(text.contains("History: n=4 | years=[2000, 2003]"));
    }

    #[test]
    fn countries_listing() {
        let (ds, _) = run();
        assert_eq!(format_countries(&ds), "X (4 year(s))\n");
    }
}
