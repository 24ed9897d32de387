//! # COVID-19 Dashboard
//!
//! An interactive COVID-19 dashboard served over HTTP: a world choropleth of
//! a chosen metric over a month range, per-country subplot panels, and a
//! worldwide trend chart.
//!
//! ## Modules
//!
//! - [`data`]: CSV loading, aggregation and the immutable derived views
//! - [`render`]: pure chart renderers and Plotly figure conversion
//! - [`controller`]: one selection in, all six dashboard outputs out
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use covid_dashboard::controller::Dashboard;
//! use covid_dashboard::data::{DerivedViews, Metric, Variable};
//! use covid_dashboard::render::Selection;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let views = Arc::new(DerivedViews::load(Path::new("data_cleaned.csv"))?);
//!     let dashboard = Dashboard::new(views);
//!
//!     let selection = Selection::new()
//!         .metric(Metric::Cases)
//!         .months("2020-01".parse()?, "2020-06".parse()?)
//!         .countries(["France", "Italy"])
//!         .variables([Variable::TotalCases]);
//!
//!     if let Some(outputs) = dashboard.on_selection_change(&selection).rendered() {
//!         println!("{} countries on the map", outputs.map.locations.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod data;
pub mod render;

// Re-export top-level types for convenience
pub use data::{
    CountrySnapshot, DataError, DataResult, DerivedViews, Metric, MonthKey, MonthlyBucket, Record,
    Variable,
};

pub use render::{Figure, MapSpec, PanelSpec, Render, Selection, SelectorOptions, TrendSpec};

pub use controller::{Dashboard, DashboardOutputs};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
