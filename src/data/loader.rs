//! CSV Loader
//!
//! Reads the pre-cleaned daily dataset into `Record`s. Rows that fail to
//! parse are skipped and reported; only an unreadable file or a file with
//! no usable rows is an error.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::path::Path;

use super::error::{DataError, DataResult};
use super::types::Record;

/// Maximum number of per-line errors kept in a report
const MAX_REPORTED_ERRORS: usize = 100;

/// Outcome of loading a data file
#[derive(Debug)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Row as it appears in the file. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    iso_code: String,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    population: Option<f64>,
    date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_cases: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_deaths: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    daily_cases: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    daily_deaths: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    stringency_index: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    daily_cases_per_100000: Option<f64>,
    #[serde(
        default,
        alias = "daily_deaths_per_1millions",
        deserialize_with = "csv::invalid_option"
    )]
    daily_deaths_per_1million: Option<f64>,
}

impl RawRecord {
    fn into_record(self) -> DataResult<Record> {
        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(DataError::Parse("missing location".to_string()));
        }

        Ok(Record {
            iso_code: self.iso_code.trim().to_string(),
            location,
            population: finite(self.population),
            date: parse_date(self.date.trim())?,
            total_cases: finite(self.total_cases),
            total_deaths: finite(self.total_deaths),
            daily_cases: finite(self.daily_cases),
            daily_deaths: finite(self.daily_deaths),
            stringency_index: finite(self.stringency_index),
            daily_cases_per_100000: finite(self.daily_cases_per_100000),
            daily_deaths_per_1million: finite(self.daily_deaths_per_1million),
        })
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Parse a calendar date, accepting a trailing time component
fn parse_date(s: &str) -> DataResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {}", s)))
}

/// Load records from a CSV file
pub fn load_records(path: &Path) -> DataResult<LoadReport> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_records(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Load records from CSV text
pub fn load_records_str(csv_data: &str) -> DataResult<LoadReport> {
    read_records(
        csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_data.as_bytes()),
    )
}

fn read_records<R: std::io::Read>(mut reader: csv::Reader<R>) -> DataResult<LoadReport> {
    // Fail early on an unreadable header rather than reporting every row
    reader.headers()?;

    let mut records = Vec::new();
    let mut rows_failed = 0;
    let mut errors = Vec::new();

    for (line_num, result) in reader.deserialize::<RawRecord>().enumerate() {
        // Header occupies line 1
        let line = line_num + 2;

        let parsed = result
            .map_err(DataError::from)
            .and_then(RawRecord::into_record);

        match parsed {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!(line, error = %e, "Skipping malformed row");
                errors.push(format!("Line {}: {}", line, e));
                rows_failed += 1;
            }
        }
    }

    if records.is_empty() {
        return Err(DataError::Empty { rows_failed });
    }

    if errors.len() > MAX_REPORTED_ERRORS {
        let total = errors.len();
        errors.truncate(MAX_REPORTED_ERRORS);
        errors.push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
    }

    Ok(LoadReport {
        rows_processed: records.len(),
        records,
        rows_failed,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "iso_code,location,population,date,total_cases,total_deaths,daily_cases,daily_deaths,stringency_index,daily_cases_per_100000,daily_deaths_per_1millions";

    #[test]
    fn test_load_simple_csv() {
        let csv_data = format!(
            "{HEADER}
FRA,France,67886004.0,2020-03-01,130,2,30,0,5.56,0.044,0.0
FRA,France,67886004.0,2020-03-02,191,3,61,1,5.56,0.09,0.0147"
        );

        let report = load_records_str(&csv_data).unwrap();

        assert_eq!(report.rows_processed, 2);
        assert_eq!(report.rows_failed, 0);

        let first = &report.records[0];
        assert_eq!(first.iso_code, "FRA");
        assert_eq!(first.location, "France");
        assert_eq!(first.population, Some(67886004.0));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(first.total_cases, Some(130.0));
        assert_eq!(report.records[1].daily_deaths_per_1million, Some(0.0147));
    }

    #[test]
    fn test_missing_values_are_none() {
        let csv_data = format!(
            "{HEADER}
ITA,Italy,,2020-02-01,,,5,,,,"
        );

        let report = load_records_str(&csv_data).unwrap();
        let record = &report.records[0];

        assert_eq!(record.population, None);
        assert_eq!(record.total_cases, None);
        assert_eq!(record.daily_cases, Some(5.0));
        assert_eq!(record.stringency_index, None);
    }

    #[test]
    fn test_bad_rows_are_reported_not_fatal() {
        let csv_data = format!(
            "{HEADER}
ITA,Italy,60000000,2020-02-01,1,0,1,0,,,
ITA,Italy,60000000,not-a-date,1,0,1,0,,,
,,60000000,2020-02-03,1,0,1,0,,,"
        );

        let report = load_records_str(&csv_data).unwrap();

        assert_eq!(report.rows_processed, 1);
        assert_eq!(report.rows_failed, 2);
        assert!(report.errors[0].starts_with("Line 3:"));
        assert!(report.errors[1].contains("missing location"));
    }

    #[test]
    fn test_datetime_dates_are_truncated() {
        let csv_data = format!(
            "{HEADER}
ITA,Italy,60000000,2020-02-01 00:00:00,1,0,1,0,,,"
        );

        let report = load_records_str(&csv_data).unwrap();
        assert_eq!(
            report.records[0].date,
            NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let result = load_records_str(HEADER);
        assert!(matches!(result, Err(DataError::Empty { rows_failed: 0 })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "DEU,Germany,83000000,2020-04-01,70000,800,5000,150,76.85,6.0,1.8").unwrap();

        let report = load_records(file.path()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].location, "Germany");
    }

    #[test]
    fn test_missing_file() {
        let result = load_records(Path::new("/nonexistent/data_cleaned.csv"));
        assert!(matches!(result, Err(DataError::Io { .. })));
    }
}
