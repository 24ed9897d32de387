//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::controller::DashboardOutputs;
use crate::data::{CountrySnapshot, MonthlyBucket};
use crate::render::{Figure, Render};

// ============================================
// DASHBOARD DTOs
// ============================================

/// Result of a dashboard render
///
/// `unchanged` tells the page to keep the charts it already shows.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DashboardResponse {
    Rendered {
        status_map: String,
        map: Figure,
        trend: Figure,
        status_country: String,
        status_variable: String,
        panels: Figure,
    },
    Unchanged {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
}

impl From<Render<DashboardOutputs>> for DashboardResponse {
    fn from(render: Render<DashboardOutputs>) -> Self {
        match render {
            Render::Rendered(outputs) => DashboardResponse::Rendered {
                map: outputs.map.to_figure(),
                trend: outputs.trend.to_figure(),
                panels: outputs.panels.to_figure(),
                status_map: outputs.status_map,
                status_country: outputs.status_country,
                status_variable: outputs.status_variable,
            },
            Render::Unchanged { status } => DashboardResponse::Unchanged { status },
        }
    }
}

// ============================================
// DATA DTOs
// ============================================

/// Snapshot row with unplottable rates reported as null
#[derive(Debug, Serialize)]
pub struct SnapshotRow {
    pub iso_code: String,
    pub location: String,
    pub population: Option<f64>,
    pub total_cases: f64,
    pub total_deaths: f64,
    pub cases_per_100000: Option<f64>,
    pub deaths_per_million: Option<f64>,
}

impl From<&CountrySnapshot> for SnapshotRow {
    fn from(row: &CountrySnapshot) -> Self {
        Self {
            iso_code: row.iso_code.clone(),
            location: row.location.clone(),
            population: row.population,
            total_cases: row.total_cases,
            total_deaths: row.total_deaths,
            cases_per_100000: finite(row.cases_per_100000),
            deaths_per_million: finite(row.deaths_per_million),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Snapshot listing
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub total: usize,
    pub countries: Vec<SnapshotRow>,
}

/// Monthly listing filters
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyQuery {
    /// Restrict to one country (by name)
    #[serde(default)]
    pub country: Option<String>,
    /// First month to include (`YYYY-MM`)
    #[serde(default)]
    pub start: Option<String>,
    /// First month to exclude (`YYYY-MM`)
    #[serde(default)]
    pub end: Option<String>,
}

/// Monthly listing
#[derive(Debug, Serialize)]
pub struct MonthlyResponse {
    pub total: usize,
    pub buckets: Vec<MonthlyBucket>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    pub records: usize,
    pub countries: usize,
    pub months: usize,
    /// Address the server is bound to
    pub address: String,
    pub uptime_seconds: u64,
    pub version: String,
}
