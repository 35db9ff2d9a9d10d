//! Dashboard snapshot endpoint

use crate::state::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;
use frontdesk_core::types::ApiResponse;
use frontdesk_store::DashboardSnapshot;
use std::sync::Arc;

/// Aggregate counters, the weekly series and recent calls in one payload
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<DashboardSnapshot>> {
    let snapshot = DashboardSnapshot::compute(&state.calls, &state.appointments, Utc::now());
    Json(ApiResponse::success(snapshot))
}
