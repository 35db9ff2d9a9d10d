//! Chat endpoint driving the receptionist tester
//!
//! The chat contract survives responder outages: a failed reply turns into
//! HTTP 200 carrying the fixed apology with intent `error`, so the tester UI
//! renders it like any other turn. Only malformed requests get the error
//! envelope.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use frontdesk_core::types::{ApiResponse, CallRecord, CallStatus, ErrorResponse, Intent};
use frontdesk_dialogue::{BookingRequest, DialogueStage, ReceptionistService, SessionInfo};
use frontdesk_nlu::{APOLOGY_RESPONSE, ExtractedEntities, SUGGESTED_UTTERANCES};
use frontdesk_store::NewAppointment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Chat request body
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// Caller utterance
    #[validate(length(min = 1, max = 2000))]
    pub message: String,

    /// Session to continue; omitted on the first turn
    pub session_id: Option<String>,
}

/// One receptionist turn as rendered by the tester UI
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Session the reply belongs to
    pub session_id: String,

    /// Reply text
    pub response: String,

    /// Matched intent label
    pub intent: String,

    /// Rule confidence, absent on the apology turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    /// CSS utility classes for the intent badge
    pub badge_style: String,

    /// Entities extracted from the utterance
    pub entities: ExtractedEntities,

    /// Conversation stage after this turn
    pub state: DialogueStage,

    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
}

/// Handle one chat turn
///
/// # Errors
///
/// * `BAD_REQUEST` - Blank or oversized message
pub async fn text_chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(validation_errors) = body.validate() {
        warn!("Invalid chat request: {:?}", validation_errors);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Invalid request body", "INVALID_PARAMETERS")
                    .with_details(serde_json::json!(validation_errors)),
            ),
        ));
    }

    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "message must not be blank",
                "INVALID_PARAMETERS",
            )),
        ));
    }

    match state
        .receptionist
        .respond(body.session_id.as_deref(), &message)
        .await
    {
        Ok(reply) => {
            if let Some(request) = &reply.booking {
                persist_booking(&state, &reply.session_id, request);
            }

            Ok(Json(ChatResponse {
                session_id: reply.session_id,
                response: reply.response,
                intent: reply.intent.label().to_string(),
                confidence: Some(reply.confidence),
                badge_style: reply.intent.badge_style().to_string(),
                entities: reply.entities,
                state: reply.state,
                timestamp: Utc::now(),
            }))
        }
        Err(e) if e.is_retryable() => {
            // Responder outage: the caller gets the fixed apology, not a fault
            warn!(error = %e, "receptionist unavailable, substituting the apology");
            let session_id = body
                .session_id
                .unwrap_or_else(|| "unknown".to_string());
            let stage = state
                .sessions
                .get_info(&session_id)
                .map_or(DialogueStage::Initial, |info| info.state);

            Ok(Json(ChatResponse {
                session_id,
                response: APOLOGY_RESPONSE.to_string(),
                intent: Intent::Error.label().to_string(),
                confidence: None,
                badge_style: Intent::Error.badge_style().to_string(),
                entities: ExtractedEntities::default(),
                state: stage,
                timestamp: Utc::now(),
            }))
        }
        Err(e) => {
            warn!(error = %e, "chat request rejected");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string(), "INVALID_PARAMETERS")),
            ))
        }
    }
}

/// Session info for the tester sidebar
///
/// # Errors
///
/// * `NOT_FOUND` - No session with the given id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionInfo>>, (StatusCode, Json<ErrorResponse>)> {
    state.sessions.get_info(&session_id).map_or_else(
        || {
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Session {session_id} not found"),
                    "SESSION_NOT_FOUND",
                )),
            ))
        },
        |info| Ok(Json(ApiResponse::success(info))),
    )
}

/// Reset a session to a fresh conversation under the same id
///
/// # Errors
///
/// * `NOT_FOUND` - No session with the given id
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionInfo>>, (StatusCode, Json<ErrorResponse>)> {
    match state.sessions.reset(&session_id) {
        Ok(info) => {
            info!(session_id = %session_id, "session reset");
            Ok(Json(ApiResponse::success_with_message(
                info,
                "Session reset",
            )))
        }
        Err(e) => {
            warn!(error = %e, "session reset failed");
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("Session {session_id} not found"),
                    "SESSION_NOT_FOUND",
                )),
            ))
        }
    }
}

/// One entry of the display intent set
#[derive(Debug, Serialize)]
pub struct IntentDescriptor {
    /// Wire label
    pub label: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// CSS utility classes for the badge
    pub badge_style: &'static str,
}

/// Display intent set plus the tester's canned suggestions
#[derive(Debug, Serialize)]
pub struct IntentCatalog {
    /// Recognized intent labels in display order
    pub intents: Vec<IntentDescriptor>,
    /// Badge classes for labels outside the set
    pub default_badge_style: &'static str,
    /// Canned utterances offered by the tester UI
    pub suggestions: Vec<&'static str>,
}

/// Serve the display intent set
pub async fn list_intents() -> Json<ApiResponse<IntentCatalog>> {
    let intents = Intent::ALL
        .iter()
        .map(|intent| IntentDescriptor {
            label: intent.label(),
            display_name: intent.display_name(),
            badge_style: intent.badge_style(),
        })
        .collect();

    Json(ApiResponse::success(IntentCatalog {
        intents,
        default_badge_style: Intent::DEFAULT_BADGE_STYLE,
        suggestions: SUGGESTED_UTTERANCES.to_vec(),
    }))
}

/// Persist a confirmed booking into the appointment book and call log
fn persist_booking(state: &AppState, session_id: &str, request: &BookingRequest) {
    let now = Utc::now();
    let scheduled_date = resolve_date(&request.requested_date, now.date_naive());
    let scheduled_time = resolve_time(&request.requested_time);

    let appointment = state.appointments.insert(NewAppointment {
        customer_name: request.customer_name.clone(),
        customer_phone: Some(request.customer_phone.clone()),
        customer_email: request.customer_email.clone(),
        service_type: request.service_type.clone(),
        scheduled_date,
        scheduled_time,
        duration_minutes: state.config.business.appointment_duration_minutes,
        notes: Some(format!(
            "Requested: {} at {}",
            request.requested_date, request.requested_time
        )),
    });

    let summary = format!(
        "Customer booked a {} appointment for {} at {}.",
        request.service_type.to_lowercase(),
        request.requested_date,
        request.requested_time
    );

    let started = state
        .sessions
        .get_info(session_id)
        .map_or(now, |info| info.created_at);
    let max_duration = i64::from(state.config.business.max_call_duration_seconds);

    let apply = |call: &mut CallRecord| {
        call.caller_name = Some(request.customer_name.clone());
        call.caller_phone = Some(request.customer_phone.clone());
        call.caller_email = request.customer_email.clone();
        call.end_time = Some(now);
        call.duration_seconds = Some((now - call.start_time).num_seconds().min(max_duration));
        call.status = CallStatus::Completed;
        call.primary_intent = Some(Intent::AppointmentBooking.label().to_string());
        call.conversation_summary = Some(summary.clone());
        call.appointment_booked = true;
        call.lead_qualified = true;
    };

    match state.calls.get_by_session(session_id) {
        Some(existing) => {
            if let Err(e) = state.calls.update(existing.id, apply) {
                warn!(error = %e, "failed to update call record for booking");
            }
        }
        None => {
            let mut record = CallRecord::new(session_id);
            record.start_time = started;
            apply(&mut record);
            state.calls.insert(record);
        }
    }

    info!(
        appointment_id = %appointment.id,
        customer = %appointment.customer_name,
        "appointment persisted from chat booking"
    );
}

/// Turn a caller's date phrasing into a calendar date
///
/// Vague phrasing books the next day rather than failing the handoff.
fn resolve_date(phrase: &str, today: NaiveDate) -> NaiveDate {
    let folded = phrase.trim().to_lowercase();

    if folded.contains("today") {
        return today;
    }
    if folded.contains("tomorrow") {
        return today + Duration::days(1);
    }

    const WEEKDAYS: [&str; 7] = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    for (target, name) in WEEKDAYS.iter().enumerate() {
        if folded.contains(name) {
            let current = i64::from(today.weekday().num_days_from_monday());
            let target = i64::try_from(target).unwrap_or(0);
            let mut ahead = (target + 7 - current) % 7;
            if ahead == 0 {
                ahead = 7;
            }
            return today + Duration::days(ahead);
        }
    }

    if let Some(token) = folded.split_whitespace().next() {
        for format in ["%m/%d/%Y", "%Y-%m-%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(token, format) {
                return date;
            }
        }
    }

    // "august 24" style phrasing, pinned to this year or the next
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{} {}", folded, today.year()), "%B %d %Y")
    {
        return if date < today {
            date.with_year(today.year() + 1).unwrap_or(date)
        } else {
            date
        };
    }

    today + Duration::days(1)
}

/// Turn a caller's time phrasing into a time of day
///
/// Day-part words map onto the slot grid; unparseable phrasing gets the
/// opening slot.
fn resolve_time(phrase: &str) -> NaiveTime {
    let folded = phrase.trim().to_lowercase();

    // "afternoon" must be checked before "noon", which it contains
    for (word, hour) in [
        ("morning", 10),
        ("afternoon", 14),
        ("evening", 17),
        ("noon", 12),
    ] {
        if folded.contains(word) {
            return hm(hour, 0);
        }
    }

    let upper = folded.to_uppercase();
    for format in ["%I:%M %p", "%I:%M%p", "%I %p", "%I%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&upper, format) {
            return time;
        }
    }
    if let Ok(time) = NaiveTime::parse_from_str(&folded, "%H:%M") {
        return time;
    }

    hm(9, 0)
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
