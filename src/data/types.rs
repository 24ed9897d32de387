//! Core data types for the dashboard dataset
//!
//! This module defines the fundamental types shared by the loader, the
//! aggregator and the render engine:
//! - `Record`: one daily observation for one country
//! - `CountrySnapshot` and `MonthlyBucket`: the derived views
//! - `MonthKey`: a calendar month bucket (`YYYY-MM`)
//! - `Metric` and `Variable`: the selectable map metrics and panel variables

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DataError;

/// A single daily observation for one country
///
/// Numeric measures are optional: an empty cell in the source file is
/// "missing", which is not the same thing as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// ISO 3166-1 alpha-3 code
    pub iso_code: String,
    /// Country name
    pub location: String,
    pub population: Option<f64>,
    pub date: NaiveDate,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub daily_cases: Option<f64>,
    pub daily_deaths: Option<f64>,
    pub stringency_index: Option<f64>,
    pub daily_cases_per_100000: Option<f64>,
    pub daily_deaths_per_1million: Option<f64>,
}

impl Record {
    /// Raw value of a panel variable for this row
    pub fn value(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::TotalCases => self.total_cases,
            Variable::TotalDeaths => self.total_deaths,
            Variable::DailyCases => self.daily_cases,
            Variable::DailyDeaths => self.daily_deaths,
            Variable::StringencyIndex => self.stringency_index,
            Variable::DailyCasesPer100000 => self.daily_cases_per_100000,
            Variable::DailyDeathsPerMillion => self.daily_deaths_per_1million,
        }
    }

    /// Calendar month this row falls in
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Per-country totals over the whole dataset
///
/// Rates are NaN or infinite when the population is missing or zero;
/// such rows cannot be plotted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySnapshot {
    pub iso_code: String,
    pub location: String,
    pub population: Option<f64>,
    /// Peak cumulative case count
    pub total_cases: f64,
    /// Peak cumulative death count
    pub total_deaths: f64,
    pub cases_per_100000: f64,
    pub deaths_per_million: f64,
}

impl CountrySnapshot {
    /// Snapshot column matching a map metric
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cases => self.total_cases,
            Metric::Deaths => self.total_deaths,
            Metric::CasesPer100000 => self.cases_per_100000,
            Metric::DeathsPerMillion => self.deaths_per_million,
        }
    }
}

/// Daily measures summed over one calendar month for one country
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub iso_code: String,
    pub location: String,
    pub population: Option<f64>,
    #[serde(rename = "month_year")]
    pub month: MonthKey,
    pub cases: f64,
    pub deaths: f64,
    pub cases_per_100000: f64,
    pub deaths_per_million: f64,
}

impl MonthlyBucket {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
            Metric::CasesPer100000 => self.cases_per_100000,
            Metric::DeathsPerMillion => self.deaths_per_million,
        }
    }
}

/// Worldwide sums for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalDay {
    pub date: NaiveDate,
    pub total_cases: f64,
    pub total_deaths: f64,
    pub daily_cases: f64,
    pub daily_deaths: f64,
}

/// A calendar month, ordered chronologically and labelled `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, returning None if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Whether `self` lies in the half-open range `[start, end)`
    pub fn within(&self, start: MonthKey, end: MonthKey) -> bool {
        start <= *self && *self < end
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DataError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Metric used to color the choropleth map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "cases")]
    Cases,
    #[serde(rename = "deaths")]
    Deaths,
    #[serde(rename = "cases_per_100000")]
    CasesPer100000,
    #[serde(rename = "deaths_per_million")]
    DeathsPerMillion,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[
            Metric::Cases,
            Metric::Deaths,
            Metric::CasesPer100000,
            Metric::DeathsPerMillion,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::CasesPer100000 => "cases_per_100000",
            Metric::DeathsPerMillion => "deaths_per_million",
        }
    }

    /// Human-readable label for selectors and color bars
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cases => "Cases",
            Metric::Deaths => "Deaths",
            Metric::CasesPer100000 => "Cases per 100 000",
            Metric::DeathsPerMillion => "Deaths per million",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                DataError::Parse(format!(
                    "Invalid metric: {}. Use cases, deaths, cases_per_100000 or deaths_per_million",
                    s
                ))
            })
    }
}

/// Per-country variable plotted in the comparison panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "total_cases")]
    TotalCases,
    #[serde(rename = "total_deaths")]
    TotalDeaths,
    #[serde(rename = "daily_cases")]
    DailyCases,
    #[serde(rename = "daily_deaths")]
    DailyDeaths,
    #[serde(rename = "stringency_index")]
    StringencyIndex,
    #[serde(rename = "daily_cases_per_100000")]
    DailyCasesPer100000,
    #[serde(
        rename = "daily_deaths_per_1million",
        alias = "daily_deaths_per_1millions"
    )]
    DailyDeathsPerMillion,
}

impl Variable {
    pub fn all() -> &'static [Variable] {
        &[
            Variable::TotalCases,
            Variable::TotalDeaths,
            Variable::DailyCases,
            Variable::DailyDeaths,
            Variable::StringencyIndex,
            Variable::DailyCasesPer100000,
            Variable::DailyDeathsPerMillion,
        ]
    }

    /// Column name in the dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::TotalCases => "total_cases",
            Variable::TotalDeaths => "total_deaths",
            Variable::DailyCases => "daily_cases",
            Variable::DailyDeaths => "daily_deaths",
            Variable::StringencyIndex => "stringency_index",
            Variable::DailyCasesPer100000 => "daily_cases_per_100000",
            Variable::DailyDeathsPerMillion => "daily_deaths_per_1million",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Variable::TotalCases => "Total cases",
            Variable::TotalDeaths => "Total deaths",
            Variable::DailyCases => "Daily cases",
            Variable::DailyDeaths => "Daily deaths",
            Variable::StringencyIndex => "Stringency",
            Variable::DailyCasesPer100000 => "Daily cases per 100000",
            Variable::DailyDeathsPerMillion => "Daily deaths per million",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key == "daily_deaths_per_1millions" {
            return Ok(Variable::DailyDeathsPerMillion);
        }

        Variable::all()
            .iter()
            .copied()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| DataError::Parse(format!("Invalid variable: {}", s)))
    }
}
