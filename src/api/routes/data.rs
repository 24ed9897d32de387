//! Data Routes
//!
//! Read-only access to the derived tables behind the charts.
//!
//! - GET /api/v1/snapshot - Latest totals and rates per country
//! - GET /api/v1/monthly - Monthly sums, optionally for one country and month range

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{MonthlyQuery, MonthlyResponse, SnapshotResponse, SnapshotRow};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::data::MonthKey;

/// GET /api/v1/snapshot
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<SnapshotResponse> {
    let countries: Vec<SnapshotRow> = state.views.snapshot().iter().map(SnapshotRow::from).collect();

    Json(SnapshotResponse {
        total: countries.len(),
        countries,
    })
}

/// GET /api/v1/monthly
///
/// `start` is inclusive and `end` exclusive, matching the map.
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Json<MonthlyResponse>> {
    if let Some(country) = &query.country {
        if !state.views.has_country(country) {
            return Err(ApiError::NotFound(format!("Country '{}'", country)));
        }
    }

    let start = query.start.as_deref().map(str::parse::<MonthKey>).transpose()?;
    let end = query.end.as_deref().map(str::parse::<MonthKey>).transpose()?;

    let buckets: Vec<_> = state
        .views
        .monthly()
        .iter()
        .filter(|b| query.country.as_ref().map_or(true, |c| &b.location == c))
        .filter(|b| start.map_or(true, |s| b.month >= s))
        .filter(|b| end.map_or(true, |e| b.month < e))
        .cloned()
        .collect();

    Ok(Json(MonthlyResponse {
        total: buckets.len(),
        buckets,
    }))
}
