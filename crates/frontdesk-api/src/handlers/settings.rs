//! Business settings endpoints

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use frontdesk_core::error::Error;
use frontdesk_core::types::{ApiResponse, ErrorResponse};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

/// All business settings in key order
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<BTreeMap<String, String>>> {
    Json(ApiResponse::success(state.settings.all()))
}

/// Apply a batch of settings edits
///
/// Unknown keys are stored as new rows; the response carries the full map
/// after the batch lands.
///
/// # Errors
///
/// * `BAD_REQUEST` - Empty batch or a blank key
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(changes): Json<BTreeMap<String, String>>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, (StatusCode, Json<ErrorResponse>)> {
    if changes.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "No settings provided",
                "INVALID_PARAMETERS",
            )),
        ));
    }

    match state.settings.update(&changes) {
        Ok(updated) => Ok(Json(ApiResponse::success_with_message(
            updated,
            "Settings updated",
        ))),
        Err(Error::Validation { field, message }) => {
            warn!(field = %field, "settings update rejected");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(message, "INVALID_PARAMETERS")),
            ))
        }
        Err(e) => {
            error!(error = %e, "settings update failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to update settings",
                    "INTERNAL_ERROR",
                )),
            ))
        }
    }
}
