//! Dataset layer
//!
//! - **types**: Record, derived row types, month keys, metric/variable enums
//! - **loader**: CSV file → records
//! - **aggregate**: snapshot, monthly and global aggregations
//! - **views**: immutable derived views built once at startup
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use covid_dashboard::data::DerivedViews;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let views = DerivedViews::load(Path::new("data_cleaned.csv"))?;
//!
//!     for row in views.snapshot().iter().take(5) {
//!         println!("{}: {} cases", row.location, row.total_cases);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod error;
pub mod loader;
pub mod types;
pub mod views;

pub use aggregate::{build_global_daily, build_monthly, build_snapshot, per_capita};
pub use error::{DataError, DataResult};
pub use loader::{load_records, load_records_str, LoadReport};
pub use types::{CountrySnapshot, GlobalDay, Metric, MonthKey, MonthlyBucket, Record, Variable};
pub use views::DerivedViews;

/// Small two-country dataset shared by unit tests
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub const FRANCE_POPULATION: f64 = 67_000_000.0;
    pub const ITALY_POPULATION: f64 = 60_000_000.0;

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        iso_code: &str,
        location: &str,
        population: f64,
        date: &str,
        daily_cases: f64,
        total_cases: f64,
        daily_deaths: f64,
        total_deaths: f64,
    ) -> Record {
        Record {
            iso_code: iso_code.to_string(),
            location: location.to_string(),
            population: Some(population),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            total_cases: Some(total_cases),
            total_deaths: Some(total_deaths),
            daily_cases: Some(daily_cases),
            daily_deaths: Some(daily_deaths),
            stringency_index: Some(50.0),
            daily_cases_per_100000: Some(100_000.0 * daily_cases / population),
            daily_deaths_per_1million: Some(1_000_000.0 * daily_deaths / population),
        }
    }

    /// France and Italy from late January to mid March 2020
    pub fn sample_records() -> Vec<Record> {
        let fr = |date: &str, dc: f64, tc: f64, dd: f64, td: f64| {
            record("FRA", "France", FRANCE_POPULATION, date, dc, tc, dd, td)
        };
        let it = |date: &str, dc: f64, tc: f64, dd: f64, td: f64| {
            record("ITA", "Italy", ITALY_POPULATION, date, dc, tc, dd, td)
        };

        vec![
            fr("2020-01-30", 1.0, 1.0, 0.0, 0.0),
            fr("2020-01-31", 2.0, 3.0, 0.0, 0.0),
            fr("2020-02-10", 5.0, 8.0, 1.0, 1.0),
            fr("2020-02-20", 7.0, 15.0, 1.0, 2.0),
            fr("2020-03-05", 100.0, 115.0, 3.0, 5.0),
            it("2020-03-10", 500.0, 532.0, 10.0, 13.0),
            it("2020-02-28", 20.0, 32.0, 2.0, 3.0),
            it("2020-01-31", 2.0, 2.0, 0.0, 0.0),
            it("2020-02-15", 10.0, 12.0, 1.0, 1.0),
        ]
    }

    pub fn sample_views() -> DerivedViews {
        DerivedViews::build(sample_records())
    }
}
