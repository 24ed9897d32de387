//! Reactive Controller
//!
//! Maps one selection to all six dashboard outputs in a single synchronous
//! pass. Either every output is produced or none is.
//!
//! ```text
//! Selection ─► map guard ─► panel guard ─► render map, panels, trend ─► outputs
//!                  │             │
//!                  └─────────────┴──► Unchanged (keep what is on screen)
//! ```

use serde::Serialize;
use std::sync::Arc;

use crate::data::DerivedViews;
use crate::render::{
    render_country_panels, render_global_trend, render_map, MapSpec, PanelSpec, Render,
    Selection, TrendSpec, COUNTRY_STATUS, MAP_STATUS, VARIABLE_STATUS,
};

/// The six outputs of one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardOutputs {
    pub status_map: String,
    pub map: MapSpec,
    pub trend: TrendSpec,
    pub status_country: String,
    pub status_variable: String,
    pub panels: PanelSpec,
}

/// Renders the dashboard from shared, read-only views
#[derive(Debug, Clone)]
pub struct Dashboard {
    views: Arc<DerivedViews>,
}

impl Dashboard {
    pub fn new(views: Arc<DerivedViews>) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &DerivedViews {
        &self.views
    }

    /// Recompute every output for a new selection
    ///
    /// Returns `Unchanged` when the metric or either month bound is unset,
    /// or when no country or no variable is selected.
    pub fn on_selection_change(&self, selection: &Selection) -> Render<DashboardOutputs> {
        let map = match render_map(
            self.views.monthly(),
            selection.metric,
            selection.start_month,
            selection.end_month,
        ) {
            Render::Rendered(map) => map,
            Render::Unchanged { status } => {
                tracing::debug!(?selection, "Map selection incomplete, keeping previous render");
                return Render::Unchanged { status };
            }
        };

        let panels =
            match render_country_panels(&self.views, &selection.countries, &selection.variables) {
                Render::Rendered(panels) => panels,
                Render::Unchanged { status } => {
                    tracing::debug!(
                        ?selection,
                        "Panel selection incomplete, keeping previous render"
                    );
                    return Render::Unchanged { status };
                }
            };

        let trend = render_global_trend(self.views.records());

        tracing::debug!(
            metric = %map.metric,
            start = %map.start,
            end = %map.end,
            map_locations = map.locations.len(),
            panel_rows = panels.rows.len(),
            "Rendered dashboard"
        );

        Render::Rendered(DashboardOutputs {
            status_map: MAP_STATUS.to_string(),
            map,
            trend,
            status_country: COUNTRY_STATUS.to_string(),
            status_variable: VARIABLE_STATUS.to_string(),
            panels,
        })
    }
}
