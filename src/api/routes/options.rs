//! Selector option routes
//!
//! - GET /api/v1/options - Values, labels and defaults for the five controls

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::render::SelectorOptions;

/// GET /api/v1/options
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<SelectorOptions> {
    Json(SelectorOptions::from_views(&state.views))
}
