//! Export the combined historical + forecast table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! columns `Year`, `CO2 Emissions (Mt)`, `Type`, historical rows first.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{CombinedRow, ForecastSeries, HistoricalSeries, SeriesKind, YearValue};
use crate::error::AppError;

/// `{country}_forecast_{start}_{end}.csv`
///
/// The country comes from the input file, so it is reduced to a single safe
/// path component first (see [`file_name_component`]).
pub fn export_file_name(country: &str, start_year: i32, end_year: i32) -> String {
    let country = file_name_component(country);
    format!("{country}_forecast_{start_year}_{end_year}.csv")
}

/// Replace path separators, NUL/control characters and characters Windows
/// rejects with `_`. Leading dots become `_` so the name is never hidden or `..`.
pub fn file_name_component(name: &str) -> String {
    let mut out: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let dots = out.len() - out.trim_start_matches('.').len();
    out.replace_range(..dots, &"_".repeat(dots));

    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Concatenate historical rows (tagged `Historical`) and forecast rows
/// (tagged `Forecast`), keeping each segment's year order.
pub fn combined_rows(historical: &HistoricalSeries, forecast: &ForecastSeries) -> Vec<CombinedRow> {
    historical
        .points
        .iter()
        .map(|p| tagged(p, SeriesKind::Historical))
        .chain(forecast.points.iter().map(|p| tagged(p, SeriesKind::Forecast)))
        .collect()
}

fn tagged(p: &YearValue, kind: SeriesKind) -> CombinedRow {
    CombinedRow {
        year: p.year,
        value_mt: p.value_mt,
        kind,
    }
}

/// Serialize combined rows as CSV into `out`.
pub fn write_combined_csv<W: Write>(out: W, rows: &[CombinedRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Render combined rows as CSV text.
pub fn combined_csv_string(rows: &[CombinedRow]) -> Result<String, AppError> {
    let mut buf = Vec::new();
    write_combined_csv(&mut buf, rows)?;
    String::from_utf8(buf).map_err(|e| AppError::runtime(format!("Export CSV is not UTF-8: {e}")))
}

/// Write the combined CSV into `dir` using [`export_file_name`].
///
/// Returns the path written.
pub fn write_export(
    dir: &Path,
    historical: &HistoricalSeries,
    forecast: &ForecastSeries,
) -> Result<PathBuf, AppError> {
    let name = export_file_name(
        &historical.country,
        forecast.range.start(),
        forecast.range.end(),
    );
    let path = dir.join(name);
    let file = File::create(&path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    write_combined_csv(file, &combined_rows(historical, forecast))?;
    log::info!("wrote export '{}'", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::ForecastRange;

    fn fixture() -> (HistoricalSeries, ForecastSeries) {
        let historical = HistoricalSeries {
            country: "CountryX".to_string(),
            points: vec![
                YearValue { year: 2000, value_mt: 1.0 },
                YearValue { year: 2001, value_mt: 2.0 },
                YearValue { year: 2002, value_mt: 2.5 },
            ],
        };
        let range = ForecastRange::new(2024, 2026).unwrap();
        let forecast = ForecastSeries {
            range,
            points: vec![
                YearValue { year: 2024, value_mt: -46.375 },
                YearValue { year: 2025, value_mt: 0.1 + 0.2 },
                YearValue { year: 2026, value_mt: 1.0 / 3.0 },
            ],
        };
        (historical, forecast)
    }

    #[test]
    fn file_name_pattern() {
        assert_eq!(export_file_name("Brazil", 2025, 2040), "Brazil_forecast_2025_2040.csv");
    }

    #[test]
    fn file_name_keeps_country_in_one_component() {
        assert_eq!(export_file_name("Bosnia/Herz", 2024, 2025), "Bosnia_Herz_forecast_2024_2025.csv");
        assert_eq!(export_file_name("..\\up", 2024, 2025), "___up_forecast_2024_2025.csv");
        assert_eq!(export_file_name("Côte d'Ivoire", 2024, 2025), "Côte d'Ivoire_forecast_2024_2025.csv");
        assert_eq!(file_name_component("a\0b:c"), "a_b_c");
        assert_eq!(file_name_component("  "), "_");
    }

    #[test]
    fn write_export_stays_inside_dir() {
        let (mut h, f) = fixture();
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("out");
        std::fs::create_dir(&dir).unwrap();

        h.country = "../escape".to_string();
        let path = write_export(&dir, &h, &f).unwrap();
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.exists());
        assert!(!root.path().join("escape_forecast_2024_2026.csv").exists());

        h.country = "Bosnia/Herz".to_string();
        let path = write_export(&dir, &h, &f).unwrap();
        assert_eq!(path, dir.join("Bosnia_Herz_forecast_2024_2026.csv"));
        assert!(path.exists());
    }

    #[test]
    fn csv_has_header_and_segments_in_order() {
        let (h, f) = fixture();
        let text = combined_csv_string(&combined_rows(&h, &f)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Year,CO2 Emissions (Mt),Type");
        assert_eq!(lines[1], "2000,1.0,Historical");
        assert_eq!(lines[3], "2002,2.5,Historical");
        assert_eq!(lines[4], "2024,-46.375,Forecast");
        assert_eq!(lines.len(), 1 + 3 + 3);
    }

    #[test]
    fn csv_round_trip_partitions_by_type() {
        let (h, f) = fixture();
        let text = combined_csv_string(&combined_rows(&h, &f)).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut hist = BTreeSet::new();
        let mut fore = Vec::new();
        for rec in reader.records() {
            let rec = rec.unwrap();
            let year: i32 = rec[0].parse().unwrap();
            let value: f64 = rec[1].parse().unwrap();
            match &rec[2] {
                "Historical" => {
                    hist.insert(year);
                }
                "Forecast" => fore.push((year, value)),
                other => panic!("unexpected type {other}"),
            }
        }

        assert_eq!(hist, h.points.iter().map(|p| p.year).collect());
        let expected: Vec<(i32, f64)> = f.points.iter().map(|p| (p.year, p.value_mt)).collect();
        assert_eq!(fore, expected);
    }

    #[test]
    fn write_export_uses_pattern_name() {
        let (h, f) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), &h, &f).unwrap();
        assert_eq!(path.file_name().unwrap(), "CountryX_forecast_2024_2026.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Year,CO2 Emissions (Mt),Type"));
    }
}
