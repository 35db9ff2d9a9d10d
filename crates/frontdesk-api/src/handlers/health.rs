//! Health and readiness endpoints
//!
//! Every store lives in process memory, so liveness and readiness never
//! fail outright. A receptionist outage degrades the reported status
//! without turning the probe into an error.

use crate::state::AppState;
use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use frontdesk_dialogue::ReceptionistService;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Liveness payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Service version
    pub version: &'static str,
    /// When the probe ran
    pub timestamp: DateTime<Utc>,
}

/// Readiness payload
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Whether the service can take traffic
    pub ready: bool,
    /// When the probe ran
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.receptionist.health_check().await.healthy;
    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        service: "frontdesk-api",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

/// Readiness probe
pub async fn readiness_check() -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        ready: true,
        timestamp: Utc::now(),
    })
}

/// Detailed health report covering every subsystem
pub async fn detailed_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let receptionist = state.receptionist.health_check().await;
    let stats = state.receptionist.get_stats().await;

    let mut checks = serde_json::Map::new();
    checks.insert(
        "receptionist".to_string(),
        serde_json::json!({
            "name": state.receptionist.service_name(),
            "healthy": receptionist.healthy,
            "message": receptionist.message,
            "last_check": receptionist.last_check,
            "total_requests": stats.total_requests,
            "successful_requests": stats.successful_requests,
            "failed_requests": stats.failed_requests,
            "appointments_booked": stats.appointments_booked,
            "average_reply_ms": stats.average_reply_ms,
        }),
    );
    checks.insert(
        "sessions".to_string(),
        serde_json::json!({
            "live": state.sessions.len(),
            "idle": state.sessions.idle_count(),
        }),
    );
    checks.insert(
        "stores".to_string(),
        serde_json::json!({
            "calls": state.calls.len(),
            "appointments": state.appointments.len(),
            "settings": state.settings.len(),
        }),
    );

    Json(serde_json::json!({
        "service": "frontdesk-api",
        "version": env!("CARGO_PKG_VERSION"),
        "status": if receptionist.healthy { "healthy" } else { "degraded" },
        "uptime_seconds": START_TIME.elapsed().as_secs(),
        "timestamp": Utc::now(),
        "checks": checks,
    }))
}
