//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (dataset loaded)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the dataset holds at least one record.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if dataset_loaded(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = if dataset_loaded(&state) {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        records: state.views.records().len(),
        countries: state.views.snapshot().len(),
        months: state.views.months().len(),
        address: state.config.addr(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn dataset_loaded(state: &AppState) -> bool {
    !state.views.records().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::data::fixtures::sample_views;
    use crate::data::DerivedViews;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_full_health_counts() {
        let state = AppState::new(Arc::new(sample_views()), ApiConfig::new("0.0.0.0", 9000));

        let Json(health) = full_health(State(Arc::new(state))).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.records, 9);
        assert_eq!(health.countries, 2);
        assert_eq!(health.months, 3);
        assert_eq!(health.address, "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn test_empty_dataset_is_not_ready() {
        let state = AppState::new(Arc::new(DerivedViews::build(Vec::new())), ApiConfig::default());

        let status = readiness(State(Arc::new(state))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
