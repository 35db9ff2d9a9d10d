//! Route table for the dashboard API

use crate::handlers::{appointments, calls, chat, health, settings, stats};
use crate::state::AppState;
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

/// Voice tester routes
pub fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/voice/text-chat", post(chat::text_chat))
        .route("/api/voice/sessions/:session_id", get(chat::get_session))
        .route(
            "/api/voice/sessions/:session_id",
            delete(chat::reset_session),
        )
        .route("/api/intents", get(chat::list_intents))
}

/// Call log routes
pub fn phone_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/phone/calls", get(calls::list_calls))
        .route("/api/phone/calls/export", get(calls::export_calls))
        .route("/api/phone/calls/:call_id", get(calls::get_call))
}

/// Appointment book routes
pub fn appointment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/appointments", get(appointments::list_appointments))
        .route("/api/appointments", post(appointments::create_appointment))
        .route(
            "/api/appointments/availability",
            get(appointments::availability),
        )
        .route(
            "/api/appointments/today",
            get(appointments::today_appointments),
        )
        .route(
            "/api/appointments/upcoming",
            get(appointments::upcoming_appointments),
        )
        .route(
            "/api/appointments/:appointment_id/status",
            patch(appointments::update_appointment_status),
        )
}

/// Dashboard and settings routes
pub fn dashboard_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/stats", get(stats::dashboard_stats))
        .route("/api/settings", get(settings::get_settings))
        .route("/api/settings", put(settings::update_settings))
}

/// Probe routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/health/detailed", get(health::detailed_health))
}

/// Root banner and API catalogue routes
pub fn docs_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root_endpoint))
        .route("/api", get(api_info))
        .route("/api/docs", get(serve_api_docs))
}

async fn root_endpoint() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Frontdesk Dashboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "documentation": "/api/docs",
        "health": "/health"
    }))
}

async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Frontdesk Dashboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat": "/api/voice/text-chat",
            "sessions": "/api/voice/sessions/{session_id}",
            "intents": "/api/intents",
            "calls": "/api/phone/calls",
            "appointments": "/api/appointments",
            "stats": "/api/dashboard/stats",
            "settings": "/api/settings"
        }
    }))
}

async fn serve_api_docs() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Frontdesk Dashboard API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            {"method": "POST", "path": "/api/voice/text-chat", "description": "Send one chat turn to the receptionist"},
            {"method": "GET", "path": "/api/voice/sessions/{session_id}", "description": "Inspect a conversation session"},
            {"method": "DELETE", "path": "/api/voice/sessions/{session_id}", "description": "Reset a conversation session"},
            {"method": "GET", "path": "/api/intents", "description": "Recognized intents and badge styles"},
            {"method": "GET", "path": "/api/phone/calls", "description": "List calls with filtering and pagination"},
            {"method": "GET", "path": "/api/phone/calls/export", "description": "Export matching calls as CSV"},
            {"method": "GET", "path": "/api/phone/calls/{call_id}", "description": "Fetch one call"},
            {"method": "GET", "path": "/api/appointments", "description": "List appointments"},
            {"method": "POST", "path": "/api/appointments", "description": "Book an appointment"},
            {"method": "GET", "path": "/api/appointments/availability", "description": "Open slots for the next week"},
            {"method": "GET", "path": "/api/appointments/today", "description": "Today's appointments, cancelled excluded"},
            {"method": "GET", "path": "/api/appointments/upcoming", "description": "Open bookings after today"},
            {"method": "PATCH", "path": "/api/appointments/{appointment_id}/status", "description": "Move an appointment to a new status"},
            {"method": "GET", "path": "/api/dashboard/stats", "description": "Dashboard snapshot"},
            {"method": "GET", "path": "/api/settings", "description": "Business settings"},
            {"method": "PUT", "path": "/api/settings", "description": "Edit business settings"},
            {"method": "GET", "path": "/health", "description": "Liveness probe"},
            {"method": "GET", "path": "/ready", "description": "Readiness probe"},
            {"method": "GET", "path": "/health/detailed", "description": "Detailed health report"}
        ]
    }))
}

async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not Found",
            "code": "ROUTE_NOT_FOUND",
            "message": "The requested endpoint does not exist"
        })),
    )
}

/// Assemble the full route table
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(voice_routes())
        .merge(phone_routes())
        .merge(appointment_routes())
        .merge(dashboard_routes())
        .merge(health_routes())
        .merge(docs_routes())
        .fallback(not_found_handler)
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(
            crate::middleware::logging::request_logging,
        ))
}
