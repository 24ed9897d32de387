//! Data layer error types
//!
//! Defines all errors that can occur while loading or parsing the dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the data layer
#[derive(Error, Debug)]
pub enum DataError {
    /// The data file could not be opened
    #[error("Failed to read data file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A value could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Month label is not `YYYY-MM`
    #[error("Invalid month label: {0}")]
    InvalidMonth(String),

    /// Nothing usable in the file
    #[error("No valid records found ({rows_failed} rows failed to parse)")]
    Empty { rows_failed: usize },
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::InvalidMonth("2020/01".to_string());
        assert_eq!(err.to_string(), "Invalid month label: 2020/01");

        let err = DataError::Empty { rows_failed: 3 };
        assert_eq!(
            err.to_string(),
            "No valid records found (3 rows failed to parse)"
        );
    }
}
