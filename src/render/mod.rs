//! Render Engine
//!
//! Pure functions from the derived views and the current selection to chart
//! descriptions:
//!
//! - **selection**: the five selector values and the options offered for them
//! - **map**: choropleth of a metric summed over a month range
//! - **panels**: one subplot row per variable, one line per country
//! - **trend**: worldwide totals on four overlaid y-axes
//! - **figure**: conversion of the specs above into Plotly figure JSON
//!
//! A render that lacks required selections does not fail: it returns
//! [`Render::Unchanged`] and the caller keeps whatever it showed before.

pub mod figure;
pub mod map;
pub mod panels;
pub mod selection;
pub mod trend;

pub use figure::{Figure, Layout, Trace};
pub use map::{render_map, MapLocation, MapSpec, MAP_COLOR_SCALE, MAP_STATUS};
pub use panels::{
    render_country_panels, subplot_title, PanelRow, PanelSpec, Series, COUNTRY_STATUS,
    MAX_COUNTRIES, PANEL_COLORS, SELECTION_HINT, VARIABLE_STATUS,
};
pub use selection::{SelectOption, Selection, SelectionDefaults, SelectorOptions};
pub use trend::{render_global_trend, AxisPlacement, TrendSeries, TrendSpec};

/// Outcome of a render: new output, or keep the previous one
#[derive(Debug, Clone, PartialEq)]
pub enum Render<T> {
    Rendered(T),
    /// Required selections are missing; `status` optionally tells the user why
    Unchanged { status: Option<String> },
}

impl<T> Render<T> {
    pub fn unchanged() -> Self {
        Render::Unchanged { status: None }
    }

    pub fn unchanged_with(status: impl Into<String>) -> Self {
        Render::Unchanged {
            status: Some(status.into()),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Render::Unchanged { .. })
    }

    /// The rendered value, if any
    pub fn rendered(self) -> Option<T> {
        match self {
            Render::Rendered(value) => Some(value),
            Render::Unchanged { .. } => None,
        }
    }

    /// Status attached to an unchanged outcome
    pub fn status(&self) -> Option<&str> {
        match self {
            Render::Rendered(_) => None,
            Render::Unchanged { status } => status.as_deref(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Render<U> {
        match self {
            Render::Rendered(value) => Render::Rendered(f(value)),
            Render::Unchanged { status } => Render::Unchanged { status },
        }
    }
}
