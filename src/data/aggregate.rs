//! Per-country aggregation of cleaned records.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{EmissionRecord, HistoricalSeries, YearValue};

/// Sorted, deduplicated country names.
pub fn countries(records: &[EmissionRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.country.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Sum `value_mt` per year for `country`, ascending by year.
///
/// An unknown country yields an empty series.
pub fn historical_series(records: &[EmissionRecord], country: &str) -> HistoricalSeries {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for r in records.iter().filter(|r| r.country == country) {
        *by_year.entry(r.year).or_insert(0.0) += r.value_mt;
    }

    HistoricalSeries {
        country: country.to_string(),
        points: by_year
            .into_iter()
            .map(|(year, value_mt)| YearValue { year, value_mt })
            .collect(),
    }
}
