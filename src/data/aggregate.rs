//! Aggregations over the raw records
//!
//! Builds the derived views the dashboard renders from:
//!
//! ```text
//! Records ─┬─ group by country ──────────── max totals ──► CountrySnapshot
//!          ├─ group by (country, month) ─── sum dailies ─► MonthlyBucket
//!          └─ group by date ─────────────── sum all ─────► GlobalDay
//! ```
//!
//! Countries are keyed by (iso_code, location). Population is carried from
//! the rows that report it, so a blank population cell never splits a
//! country. Missing values never contribute to a sum or a maximum.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::types::{CountrySnapshot, GlobalDay, MonthKey, MonthlyBucket, Record};

/// Grouping key for a country
type CountryKey<'a> = (&'a str, &'a str);

fn country_key(record: &Record) -> CountryKey<'_> {
    (record.iso_code.as_str(), record.location.as_str())
}

/// `scale * total / population`, NaN when population is unknown
pub fn per_capita(total: f64, population: Option<f64>, scale: f64) -> f64 {
    match population {
        Some(population) => scale * total / population,
        None => f64::NAN,
    }
}

#[derive(Default)]
struct PeakTotals {
    population: Option<f64>,
    total_cases: f64,
    total_deaths: f64,
}

/// One row per country with peak cumulative totals and per-capita rates
///
/// Cumulative counters are assumed non-decreasing, so the maximum stands in
/// for the latest value. Peaks start at zero and therefore never go negative.
pub fn build_snapshot(records: &[Record]) -> Vec<CountrySnapshot> {
    let mut groups: BTreeMap<CountryKey<'_>, PeakTotals> = BTreeMap::new();

    for record in records {
        let peak = groups.entry(country_key(record)).or_default();
        if record.population.is_some() {
            peak.population = record.population;
        }
        if let Some(cases) = record.total_cases {
            peak.total_cases = peak.total_cases.max(cases);
        }
        if let Some(deaths) = record.total_deaths {
            peak.total_deaths = peak.total_deaths.max(deaths);
        }
    }

    groups
        .into_iter()
        .map(|((iso_code, location), peak)| CountrySnapshot {
            iso_code: iso_code.to_string(),
            location: location.to_string(),
            population: peak.population,
            total_cases: peak.total_cases,
            total_deaths: peak.total_deaths,
            cases_per_100000: per_capita(peak.total_cases, peak.population, 100_000.0),
            deaths_per_million: per_capita(peak.total_deaths, peak.population, 1_000_000.0),
        })
        .collect()
}

#[derive(Default)]
struct MonthSums {
    population: Option<f64>,
    cases: f64,
    deaths: f64,
    cases_per_100000: f64,
    deaths_per_million: f64,
}

/// One row per (country, calendar month) with summed daily measures
pub fn build_monthly(records: &[Record]) -> Vec<MonthlyBucket> {
    let mut groups: BTreeMap<(CountryKey<'_>, MonthKey), MonthSums> = BTreeMap::new();

    for record in records {
        let sums = groups
            .entry((country_key(record), record.month()))
            .or_default();
        if record.population.is_some() {
            sums.population = record.population;
        }
        sums.cases += record.daily_cases.unwrap_or(0.0);
        sums.deaths += record.daily_deaths.unwrap_or(0.0);
        sums.cases_per_100000 += record.daily_cases_per_100000.unwrap_or(0.0);
        sums.deaths_per_million += record.daily_deaths_per_1million.unwrap_or(0.0);
    }

    groups
        .into_iter()
        .map(|(((iso_code, location), month), sums)| MonthlyBucket {
            iso_code: iso_code.to_string(),
            location: location.to_string(),
            population: sums.population,
            month,
            cases: sums.cases,
            deaths: sums.deaths,
            cases_per_100000: sums.cases_per_100000,
            deaths_per_million: sums.deaths_per_million,
        })
        .collect()
}

/// Worldwide totals per date, sorted by date
pub fn build_global_daily(records: &[Record]) -> Vec<GlobalDay> {
    let mut days: BTreeMap<NaiveDate, GlobalDay> = BTreeMap::new();

    for record in records {
        let day = days.entry(record.date).or_insert(GlobalDay {
            date: record.date,
            total_cases: 0.0,
            total_deaths: 0.0,
            daily_cases: 0.0,
            daily_deaths: 0.0,
        });
        day.total_cases += record.total_cases.unwrap_or(0.0);
        day.total_deaths += record.total_deaths.unwrap_or(0.0);
        day.daily_cases += record.daily_cases.unwrap_or(0.0);
        day.daily_deaths += record.daily_deaths.unwrap_or(0.0);
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{record, sample_records};
    use std::collections::HashSet;

    #[test]
    fn test_snapshot_one_row_per_country() {
        let snapshot = build_snapshot(&sample_records());

        assert_eq!(snapshot.len(), 2);
        let keys: HashSet<_> = snapshot
            .iter()
            .map(|s| (s.iso_code.clone(), s.location.clone()))
            .collect();
        assert_eq!(keys.len(), snapshot.len());
        assert!(snapshot.iter().all(|s| s.total_cases >= 0.0));
    }

    #[test]
    fn test_snapshot_takes_peak_totals() {
        let snapshot = build_snapshot(&sample_records());
        let france = snapshot.iter().find(|s| s.iso_code == "FRA").unwrap();

        assert_eq!(france.total_cases, 115.0);
        assert_eq!(france.total_deaths, 5.0);
    }

    #[test]
    fn test_snapshot_per_capita_rates() {
        let snapshot = build_snapshot(&sample_records());

        for row in &snapshot {
            let population = row.population.unwrap();
            assert_eq!(row.cases_per_100000, 100000.0 * row.total_cases / population);
            assert_eq!(
                row.deaths_per_million,
                1000000.0 * row.total_deaths / population
            );
        }
    }

    #[test]
    fn test_snapshot_zero_population_is_not_finite() {
        let mut unknown = record("XKX", "Kosovo", 1.0, "2020-03-06", 2.0, 2.0, 0.0, 0.0);
        unknown.population = None;
        let records = vec![
            record("VAT", "Vatican", 0.0, "2020-03-06", 1.0, 1.0, 0.0, 0.0),
            unknown,
        ];

        let snapshot = build_snapshot(&records);

        assert!(snapshot.iter().all(|s| !s.cases_per_100000.is_finite()));
    }

    #[test]
    fn test_snapshot_ignores_missing_totals() {
        let mut records = sample_records();
        for r in records.iter_mut().filter(|r| r.iso_code == "ITA") {
            r.total_deaths = None;
        }

        let snapshot = build_snapshot(&records);
        let italy = snapshot.iter().find(|s| s.iso_code == "ITA").unwrap();

        assert_eq!(italy.total_deaths, 0.0);
        assert_eq!(italy.total_cases, 532.0);
    }

    #[test]
    fn test_blank_population_does_not_split_country() {
        let mut blank = record("FRA", "France", 0.0, "2020-01-31", 2.0, 3.0, 0.0, 0.0);
        blank.population = None;
        let records = vec![
            record("FRA", "France", 67_000_000.0, "2020-01-30", 1.0, 1.0, 0.0, 0.0),
            blank,
            record("FRA", "France", 67_000_000.0, "2020-02-10", 5.0, 8.0, 0.0, 0.0),
            record("ITA", "Italy", 60_000_000.0, "2020-02-15", 8.0, 8.0, 0.0, 0.0),
        ];

        let snapshot = build_snapshot(&records);
        assert_eq!(snapshot.len(), 2);
        let france = snapshot.iter().find(|s| s.iso_code == "FRA").unwrap();
        assert_eq!(france.total_cases, 8.0);
        assert_eq!(france.population, Some(67_000_000.0));
        assert!(france.cases_per_100000.is_finite());

        let monthly = build_monthly(&records);
        let january: Vec<_> = monthly
            .iter()
            .filter(|b| b.iso_code == "FRA" && b.month.to_string() == "2020-01")
            .collect();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].cases, 3.0);
        assert_eq!(january[0].population, Some(67_000_000.0));
    }

    #[test]
    fn test_monthly_buckets_per_country_month() {
        let monthly = build_monthly(&sample_records());

        let labels: Vec<String> = monthly
            .iter()
            .filter(|b| b.iso_code == "FRA")
            .map(|b| b.month.to_string())
            .collect();
        assert_eq!(labels, vec!["2020-01", "2020-02", "2020-03"]);

        let feb = monthly
            .iter()
            .find(|b| b.iso_code == "ITA" && b.month.to_string() == "2020-02")
            .unwrap();
        assert_eq!(feb.cases, 30.0);
        assert_eq!(feb.deaths, 3.0);
    }

    #[test]
    fn test_monthly_sums_match_daily_sums() {
        let records = sample_records();
        let monthly = build_monthly(&records);

        for iso in ["FRA", "ITA"] {
            let from_buckets: f64 = monthly
                .iter()
                .filter(|b| b.iso_code == iso)
                .map(|b| b.cases)
                .sum();
            let from_records: f64 = records
                .iter()
                .filter(|r| r.iso_code == iso)
                .filter_map(|r| r.daily_cases)
                .sum();
            assert_eq!(from_buckets, from_records);
        }
    }

    #[test]
    fn test_global_daily_sums_across_countries() {
        let days = build_global_daily(&sample_records());

        // 2020-01-31 has rows for both countries
        let day = days
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2020, 1, 31).unwrap())
            .unwrap();
        assert_eq!(day.daily_cases, 4.0);
        assert_eq!(day.total_cases, 5.0);

        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
    }
}
