//! Dashboard Routes
//!
//! - POST /api/v1/dashboard - Render all six outputs for a selection
//!
//! An incomplete selection is not an error: the response carries
//! `"outcome": "unchanged"` and the page keeps its current charts.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::DashboardResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::render::Selection;

/// POST /api/v1/dashboard
pub async fn render_dashboard(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Selection>, JsonRejection>,
) -> ApiResult<Json<DashboardResponse>> {
    let Json(selection) = payload?;

    tracing::debug!(
        metric = ?selection.metric,
        countries = selection.countries.len(),
        variables = selection.variables.len(),
        "Dashboard render requested"
    );

    let render = state.dashboard.on_selection_change(&selection);

    Ok(Json(DashboardResponse::from(render)))
}
