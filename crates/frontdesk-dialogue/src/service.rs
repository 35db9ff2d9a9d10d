//! Receptionist service abstraction
//!
//! The dialogue engine sits behind a trait so HTTP handlers and tests can
//! swap implementations. The shipped implementation is
//! [`crate::SimulatedReceptionist`]; a live speech pipeline would implement
//! the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use frontdesk_core::types::Intent;
use frontdesk_nlu::ExtractedEntities;
use serde::Serialize;

use crate::booking::BookingRequest;
use crate::error::DialogueResult;
use crate::session::DialogueStage;

/// One receptionist reply to one caller utterance
#[derive(Debug, Clone, Serialize)]
pub struct ReceptionistReply {
    /// Session the reply belongs to
    pub session_id: String,
    /// Reply text
    pub response: String,
    /// Matched intent
    pub intent: Intent,
    /// Rule confidence for the matched intent
    pub confidence: f32,
    /// Conversation stage after this turn
    pub state: DialogueStage,
    /// Entities extracted from the utterance
    pub entities: ExtractedEntities,
    /// Booking handed off for persistence, set on the confirming turn only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingRequest>,
}

/// Service that turns caller utterances into receptionist replies
#[async_trait]
pub trait ReceptionistService: Send + Sync {
    /// Produce the reply to one utterance
    ///
    /// Resolves or creates the session, matches the utterance against the
    /// rule table and advances any booking flow in progress.
    async fn respond(
        &self,
        session_id: Option<&str>,
        utterance: &str,
    ) -> DialogueResult<ReceptionistReply>;

    /// Check whether the service can take requests
    async fn health_check(&self) -> ServiceHealth;

    /// Usage statistics since startup
    async fn get_stats(&self) -> ReceptionistStats;

    /// Service name for logs and health reports
    fn service_name(&self) -> &str;
}

/// Health report for a receptionist service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Whether the service can take requests
    pub healthy: bool,
    /// Status detail
    pub message: String,
    /// When the check ran
    pub last_check: DateTime<Utc>,
}

impl ServiceHealth {
    /// Healthy status with a detail message
    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
            last_check: Utc::now(),
        }
    }

    /// Unhealthy status with a detail message
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
            last_check: Utc::now(),
        }
    }
}

/// Cumulative usage counters for a receptionist service
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceptionistStats {
    /// Utterances received
    pub total_requests: u64,
    /// Replies produced
    pub successful_requests: u64,
    /// Requests that ended in a failure
    pub failed_requests: u64,
    /// Bookings handed off
    pub appointments_booked: u64,
    /// Running mean reply latency, milliseconds
    pub average_reply_ms: f64,
}

impl ReceptionistStats {
    /// Record a produced reply and fold its latency into the running mean
    pub fn record_success(&mut self, elapsed_ms: f64) {
        self.total_requests += 1;
        self.successful_requests += 1;
        #[allow(clippy::cast_precision_loss)]
        let n = self.successful_requests as f64;
        self.average_reply_ms += (elapsed_ms - self.average_reply_ms) / n;
    }

    /// Record a failed request
    pub fn record_failure(&mut self) {
        self.total_requests += 1;
        self.failed_requests += 1;
    }

    /// Record a booking handed off for persistence
    pub fn record_booking(&mut self) {
        self.appointments_booked += 1;
    }
}
