//! Derived views
//!
//! The dataset and everything aggregated from it, built once at startup and
//! shared read-only (behind an `Arc`) by every request afterwards.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::aggregate::{build_monthly, build_snapshot};
use super::error::DataResult;
use super::loader::load_records;
use super::types::{CountrySnapshot, MonthKey, MonthlyBucket, Record};

/// Immutable derived views over the loaded dataset
#[derive(Debug)]
pub struct DerivedViews {
    records: Vec<Record>,
    snapshot: Vec<CountrySnapshot>,
    monthly: Vec<MonthlyBucket>,
    /// Record indices per location, in date order
    by_country: BTreeMap<String, Vec<usize>>,
}

impl DerivedViews {
    /// Build all views from loaded records
    pub fn build(records: Vec<Record>) -> Self {
        let snapshot = build_snapshot(&records);
        let monthly = build_monthly(&records);

        let mut by_country: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_country
                .entry(record.location.clone())
                .or_default()
                .push(idx);
        }
        for indices in by_country.values_mut() {
            indices.sort_by_key(|&idx| records[idx].date);
        }

        tracing::info!(
            records = records.len(),
            countries = snapshot.len(),
            monthly_buckets = monthly.len(),
            "Built derived views"
        );

        Self {
            records,
            snapshot,
            monthly,
            by_country,
        }
    }

    /// Load a data file and build the views from it
    pub fn load(path: &Path) -> DataResult<Self> {
        tracing::info!("Loading dataset from {:?}", path);

        let report = load_records(path)?;
        if report.rows_failed > 0 {
            tracing::warn!(
                rows_failed = report.rows_failed,
                "Skipped {} malformed rows",
                report.rows_failed
            );
            for error in report.errors.iter().take(5) {
                tracing::warn!("{}", error);
            }
        }

        Ok(Self::build(report.records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn snapshot(&self) -> &[CountrySnapshot] {
        &self.snapshot
    }

    pub fn monthly(&self) -> &[MonthlyBucket] {
        &self.monthly
    }

    pub fn has_country(&self, location: &str) -> bool {
        self.by_country.contains_key(location)
    }

    /// Records for one country in date order; empty for unknown countries
    pub fn country_records<'a>(&'a self, location: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.by_country
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| &self.records[idx])
    }

    /// Sorted unique month labels present in the monthly view
    pub fn months(&self) -> Vec<MonthKey> {
        self.monthly
            .iter()
            .map(|b| b.month)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique country names in snapshot order
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.snapshot
            .iter()
            .map(|s| s.location.as_str())
            .filter(|location| seen.insert(*location))
            .collect()
    }

    /// First and last date in the dataset
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
