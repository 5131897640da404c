//! Loaded emissions data and per-country views of it.
//!
//! - [`EmissionsDataset`]: the cleaned records of one file, built once per load
//! - `aggregate`: group-by-year sums and the country list

use std::path::{Path, PathBuf};

use crate::domain::{EmissionRecord, HistoricalSeries};
use crate::error::AppError;
use crate::io::ingest::{IngestStats, IngestedData, load_emissions};

pub mod aggregate;

pub use aggregate::*;

/// Cleaned contents of one emissions CSV.
///
/// Loading another file replaces the whole dataset; nothing is carried over.
#[derive(Debug, Clone)]
pub struct EmissionsDataset {
    pub source: Option<PathBuf>,
    pub records: Vec<EmissionRecord>,
    pub stats: IngestStats,
    countries: Vec<String>,
}

impl EmissionsDataset {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let data = load_emissions(path)?;
        Ok(Self::from_ingest(data, Some(path.to_path_buf())))
    }

    pub fn from_ingest(data: IngestedData, source: Option<PathBuf>) -> Self {
        let countries = countries(&data.records);
        Self {
            source,
            records: data.records,
            stats: data.stats,
            countries,
        }
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.countries.binary_search_by(|c| c.as_str().cmp(country)).is_ok()
    }

    pub fn historical(&self, country: &str) -> HistoricalSeries {
        historical_series(&self.records, country)
    }

    /// Short display name of the source file.
    pub fn source_label(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_emissions;

    #[test]
    fn dataset_exposes_sorted_countries() {
        let input = "country_name,year,value\nPeru,2001,1\nChad,2001,2\nPeru,2002,3\n";
        let ds = EmissionsDataset::from_ingest(read_emissions(input.as_bytes()).unwrap(), None);
        assert_eq!(ds.countries(), &["Chad".to_string(), "Peru".to_string()]);
        assert!(ds.has_country("Peru"));
        assert!(!ds.has_country("Fiji"));
        assert_eq!(ds.historical("Peru").len(), 2);
        assert_eq!(ds.source_label(), "<memory>");
    }
}
