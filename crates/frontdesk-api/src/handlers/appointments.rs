//! Appointment book endpoints

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use frontdesk_core::error::Error;
use frontdesk_core::types::{
    ApiResponse, Appointment, AppointmentStatus, ErrorResponse, PaginationInfo,
};
use frontdesk_store::{AppointmentFilter, NewAppointment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for listing appointments
#[derive(Debug, Deserialize, Validate)]
pub struct ListAppointmentsQuery {
    /// Maximum rows to return
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,

    /// Rows to skip before the page
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    /// Keep appointments in this status
    pub status: Option<AppointmentStatus>,

    /// Keep appointments on this calendar date
    pub date: Option<NaiveDate>,

    /// Case-insensitive search over customer details and service
    pub search: Option<String>,
}

impl ListAppointmentsQuery {
    fn to_filter(&self, default_page: i64, max_page: i64) -> AppointmentFilter {
        let limit = self.limit.unwrap_or(default_page).min(max_page);
        let offset = self.offset.unwrap_or(0);
        AppointmentFilter {
            status: self.status,
            date: self.date,
            search: self.search.clone(),
            limit: usize::try_from(limit).unwrap_or(0),
            offset: usize::try_from(offset).unwrap_or(0),
        }
    }
}

/// Appointment page with pagination metadata
#[derive(Debug, Serialize)]
pub struct ListAppointmentsResponse {
    /// Page of matching appointments in schedule order
    pub appointments: Vec<Appointment>,
    /// Matching rows before pagination
    pub total: i64,
    /// Rows in this page
    pub count: i64,
    /// Rows skipped before this page
    pub offset: i64,
    /// Forward and backward paging hints
    pub pagination: PaginationInfo,
}

/// Request body for creating an appointment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    /// Customer name
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,

    /// Customer phone number
    #[validate(length(max = 30))]
    pub customer_phone: Option<String>,

    /// Customer email address
    #[validate(email)]
    pub customer_email: Option<String>,

    /// Service being booked
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,

    /// Calendar date of the visit
    pub scheduled_date: NaiveDate,

    /// Time of day of the visit
    pub scheduled_time: NaiveTime,

    /// Planned length in minutes, defaults to the configured duration
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<u32>,

    /// Free-form notes
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Request body for moving an appointment to a new status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Status to move to
    pub status: AppointmentStatus,
}

/// Open slot grid for the booking picker
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Open slots as `YYYY-MM-DD HH:MM`, soonest first
    pub slots: Vec<String>,
    /// Number of open slots
    pub total: usize,
}

/// List appointments with filtering and pagination
///
/// # Errors
///
/// * `BAD_REQUEST` - Invalid query parameters
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<ListAppointmentsResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(validation_errors) = query.validate() {
        warn!("Invalid appointment list query: {:?}", validation_errors);
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
    let (appointments, total) = state.appointments.list(&filter);

    let total = i64::try_from(total).unwrap_or(i64::MAX);
    let count = i64::try_from(appointments.len()).unwrap_or(i64::MAX);
    let offset = i64::try_from(filter.offset).unwrap_or(i64::MAX);
    let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);

    Ok(Json(ListAppointmentsResponse {
        appointments,
        total,
        count,
        offset,
        pagination: PaginationInfo::compute(offset, limit, total),
    }))
}

/// Book an appointment
///
/// # Errors
///
/// * `BAD_REQUEST` - Invalid request body
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>), (StatusCode, Json<ErrorResponse>)> {
    if let Err(validation_errors) = body.validate() {
        warn!("Invalid appointment request: {:?}", validation_errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Invalid request body", "INVALID_PARAMETERS")
                    .with_details(serde_json::json!(validation_errors)),
            ),
        ));
    }

    let appointment = state.appointments.insert(NewAppointment {
        customer_name: body.customer_name,
        customer_phone: body.customer_phone,
        customer_email: body.customer_email,
        service_type: body.service_type,
        scheduled_date: body.scheduled_date,
        scheduled_time: body.scheduled_time,
        duration_minutes: body
            .duration_minutes
            .unwrap_or(state.config.business.appointment_duration_minutes),
        notes: body.notes,
    });

    info!(
        appointment_id = %appointment.id,
        customer = %appointment.customer_name,
        "appointment booked"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(appointment))))
}

/// Move an appointment to a new status
///
/// # Errors
///
/// * `NOT_FOUND` - No appointment with the given id
/// * `UNPROCESSABLE_ENTITY` - Transition not allowed from the current status
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Appointment>>, (StatusCode, Json<ErrorResponse>)> {
    match state.appointments.update_status(appointment_id, body.status) {
        Ok(appointment) => Ok(Json(ApiResponse::success_with_message(
            appointment,
            "Appointment status updated",
        ))),
        Err(Error::NotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Appointment {appointment_id} not found"),
                "APPOINTMENT_NOT_FOUND",
            )),
        )),
        Err(Error::Conflict { message }) => {
            warn!(appointment_id = %appointment_id, "rejected status transition");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(message, "INVALID_STATUS_TRANSITION")),
            ))
        }
        Err(e) => {
            error!(error = %e, "appointment status update failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Failed to update appointment",
                    "INTERNAL_ERROR",
                )),
            ))
        }
    }
}

/// Appointments on today's calendar date, cancelled excluded
pub async fn today_appointments(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<Appointment>>> {
    let rows = state.appointments.today(Utc::now().date_naive());
    Json(ApiResponse::success(rows))
}

/// Open bookings after today
pub async fn upcoming_appointments(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<Appointment>>> {
    let rows = state.appointments.upcoming(Utc::now().date_naive());
    Json(ApiResponse::success(rows))
}

/// Open slots for the next seven days
pub async fn availability() -> Json<ApiResponse<AvailabilityResponse>> {
    let slots = frontdesk_dialogue::booking::available_slots(Utc::now());
    let total = slots.len();
    Json(ApiResponse::success(AvailabilityResponse { slots, total }))
}
