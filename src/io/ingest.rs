//! CSV ingest and cleaning.
//!
//! This module turns an emissions CSV into a clean set of `EmissionRecord`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors, exit code 2)
//! - **Lenient rows**: a value that does not coerce to a number is treated as
//!   missing and the row is dropped, never fatal
//! - **Accounting**: every dropped row is counted by reason
//! - **Separation of concerns**: no aggregation or fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{EmissionRecord, KT_PER_MT, MIN_HISTORICAL_YEAR};
use crate::error::AppError;

const COL_COUNTRY: &str = "country_name";
const COL_YEAR: &str = "year";
const COL_VALUE: &str = "value";

/// Why a row did not make it into the cleaned output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The CSV record itself could not be read.
    Unparseable,
    /// Empty country name.
    MissingCountry,
    /// Year missing or not an integral number.
    InvalidYear,
    /// Value missing or not a finite number.
    InvalidValue,
    /// Year before [`MIN_HISTORICAL_YEAR`].
    BeforeCutoff,
}

/// Row counts for one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub dropped: HashMap<DropReason, usize>,
}

impl IngestStats {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.get(&reason).copied().unwrap_or(0)
    }

    fn drop_row(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }
}

/// Ingest output: cleaned records plus accounting.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<EmissionRecord>,
    pub stats: IngestStats,
}

/// Open and clean an emissions CSV file.
pub fn load_emissions(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::malformed(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_emissions(file)?;
    log::info!(
        "loaded '{}': {} of {} rows kept",
        path.display(),
        data.stats.rows_used,
        data.stats.rows_read
    );
    Ok(data)
}

/// Clean emissions CSV text from any reader.
pub fn read_emissions<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::malformed(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let columns = RequiredColumns::resolve(&header_map)?;

    let mut records = Vec::new();
    let mut stats = IngestStats::default();

    for result in reader.records() {
        stats.rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("dropping unreadable CSV record: {e}");
                stats.drop_row(DropReason::Unparseable);
                continue;
            }
        };

        match clean_row(&record, &columns) {
            Ok(row) => records.push(row),
            Err(reason) => stats.drop_row(reason),
        }
    }

    stats.rows_used = records.len();
    if stats.dropped_total() > 0 {
        log::debug!(
            "dropped {} row(s): {:?}",
            stats.dropped_total(),
            stats.dropped
        );
    }

    Ok(IngestedData { records, stats })
}

/// Column positions of the required fields.
struct RequiredColumns {
    country: usize,
    year: usize,
    value: usize,
}

impl RequiredColumns {
    fn resolve(header_map: &HashMap<String, usize>) -> Result<Self, AppError> {
        let missing: Vec<&str> = [COL_COUNTRY, COL_YEAR, COL_VALUE]
            .into_iter()
            .filter(|c| !header_map.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            let list = missing
                .iter()
                .map(|c| format!("`{c}`"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::malformed(format!("Missing required column(s): {list}")));
        }

        Ok(Self {
            country: header_map[COL_COUNTRY],
            year: header_map[COL_YEAR],
            value: header_map[COL_VALUE],
        })
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn clean_row(record: &StringRecord, columns: &RequiredColumns) -> Result<EmissionRecord, DropReason> {
    let country = record.get(columns.country).unwrap_or("").trim();
    if country.is_empty() {
        return Err(DropReason::MissingCountry);
    }

    let year = record
        .get(columns.year)
        .and_then(coerce_year)
        .ok_or(DropReason::InvalidYear)?;
    let value = record
        .get(columns.value)
        .and_then(coerce_number)
        .ok_or(DropReason::InvalidValue)?;

    if year < MIN_HISTORICAL_YEAR {
        return Err(DropReason::BeforeCutoff);
    }

    Ok(EmissionRecord {
        country: country.to_string(),
        year,
        value_mt: value / KT_PER_MT,
    })
}

/// Parse a finite number; anything else counts as missing.
fn coerce_number(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parse an integral year (`2001` or `2001.0`).
fn coerce_year(s: &str) -> Option<i32> {
    let v = coerce_number(s)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}
