//! Call log endpoints

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::Json,
};
use chrono::{DateTime, Utc};
use frontdesk_core::types::{ApiResponse, CallRecord, CallStatus, ErrorResponse, PaginationInfo};
use frontdesk_store::CallFilter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for listing and exporting calls
#[derive(Debug, Deserialize, Validate)]
pub struct ListCallsQuery {
    /// Maximum rows to return
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,

    /// Rows to skip before the page
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    /// Keep calls in this status
    pub status: Option<CallStatus>,

    /// Keep calls whose primary intent label equals this
    pub intent: Option<String>,

    /// Case-insensitive search over caller details and summaries
    pub search: Option<String>,

    /// Keep calls starting at or after this instant
    pub from: Option<DateTime<Utc>>,

    /// Keep calls starting at or before this instant
    pub to: Option<DateTime<Utc>>,
}

impl ListCallsQuery {
    fn to_filter(&self, default_page: i64, max_page: i64) -> CallFilter {
        let limit = self.limit.unwrap_or(default_page).min(max_page);
        let offset = self.offset.unwrap_or(0);
        CallFilter {
            status: self.status,
            intent: self.intent.clone(),
            search: self.search.clone(),
            from: self.from,
            to: self.to,
            limit: usize::try_from(limit).unwrap_or(0),
            offset: usize::try_from(offset).unwrap_or(0),
        }
    }
}

/// Call log page with pagination metadata
#[derive(Debug, Serialize)]
pub struct ListCallsResponse {
    /// Page of matching calls, newest first
    pub calls: Vec<CallRecord>,
    /// Matching rows before pagination
    pub total: i64,
    /// Rows in this page
    pub count: i64,
    /// Rows skipped before this page
    pub offset: i64,
    /// Forward and backward paging hints
    pub pagination: PaginationInfo,
}

/// List calls with filtering and pagination
///
/// # Errors
///
/// * `BAD_REQUEST` - Invalid query parameters
pub async fn list_calls(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCallsQuery>,
) -> Result<Json<ListCallsResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(validation_errors) = query.validate() {
        warn!("Invalid call list query: {:?}", validation_errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Invalid query parameters", "INVALID_PARAMETERS")
                    .with_details(serde_json::json!(validation_errors)),
            ),
        ));
    }

    let filter = query.to_filter(
        state.config.api.default_page_size,
        state.config.api.max_page_size,
    );
    let (calls, total) = state.calls.list(&filter);

    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let count = i64::try_from(calls.len()).unwrap_or(i64::MAX);
    let offset = i64::try_from(filter.offset).unwrap_or(i64::MAX);
    let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);

    info!(total, count, "call log listed");

    Ok(Json(ListCallsResponse {
        calls,
        total,
        count,
        offset,
        pagination: PaginationInfo::compute(offset, limit, total),
    }))
}

/// Fetch a single call by id
///
/// # Errors
///
/// * `NOT_FOUND` - No call with the given id
pub async fn get_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CallRecord>>, (StatusCode, Json<ErrorResponse>)> {
    state.calls.get(call_id).map_or_else(
        || {
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Call {call_id} not found"),
                    "CALL_NOT_FOUND",
                )),
            ))
        },
        |call| Ok(Json(ApiResponse::success(call))),
    )
}

/// Export matching calls as a CSV attachment
///
/// The status, intent, search and date filters apply; pagination does not.
///
/// # Errors
///
/// * `BAD_REQUEST` - Invalid query parameters
/// * `INTERNAL_SERVER_ERROR` - CSV serialization failed
pub async fn export_calls(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCallsQuery>,
) -> Result<([(header::HeaderName, &'static str); 2], String), (StatusCode, Json<ErrorResponse>)> {
    if let Err(validation_errors) = query.validate() {
        warn!("Invalid call export query: {:?}", validation_errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Invalid query parameters", "INVALID_PARAMETERS")
                    .with_details(serde_json::json!(validation_errors)),
            ),
        ));
    }

    let filter = query.to_filter(
        state.config.api.default_page_size,
        state.config.api.max_page_size,
    );
    match state.calls.export_csv(&filter) {
        Ok(csv) => {
            info!(bytes = csv.len(), "call log exported");
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"call_log.csv\"",
                    ),
                ],
                csv,
            ))
        }
        Err(e) => {
            error!(error = %e, "CSV export failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to export call log",
                    "EXPORT_FAILED",
                )),
            ))
        }
    }
}
