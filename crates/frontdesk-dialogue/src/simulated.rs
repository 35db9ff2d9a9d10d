//! Scripted receptionist with simulated reply latency
//!
//! Drives the whole conversation deterministically: rule-table intent
//! matching, entity extraction and the booking state machine. The only
//! nondeterminism is the reply delay, which is injectable so tests run
//! instantly.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use frontdesk_core::config::{BusinessConfig, ReceptionistConfig};
use frontdesk_core::types::{ConversationTurn, Intent, MatchResult, TurnRole};
use frontdesk_core::utils::normalize_utterance;
use frontdesk_nlu::{
    extract_entities, match_utterance, ExtractedEntities, APOLOGY_RESPONSE, RULE_TABLE,
};
use parking_lot::Mutex;
use rand::Rng;
use tokio::time::sleep;

use crate::booking::{self, BookingRequest};
use crate::error::{DialogueError, DialogueResult};
use crate::service::{ReceptionistReply, ReceptionistService, ReceptionistStats, ServiceHealth};
use crate::session::{DialogueSession, DialogueStage, SessionStore};

/// Longest utterance accepted from a caller
const MAX_UTTERANCE_CHARS: usize = 2000;

/// How long the receptionist pretends to think before replying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDelay {
    /// Reply immediately, used by tests
    None,
    /// Always wait the same number of milliseconds
    Fixed(u64),
    /// Wait a uniformly random time within the inclusive range
    Uniform {
        /// Lower bound, milliseconds
        min_ms: u64,
        /// Upper bound, milliseconds
        max_ms: u64,
    },
}

impl ReplyDelay {
    /// Map configured delay bounds onto a delay mode
    #[must_use]
    pub const fn from_config(config: &ReceptionistConfig) -> Self {
        if config.max_reply_delay_ms == 0 {
            Self::None
        } else if config.min_reply_delay_ms >= config.max_reply_delay_ms {
            Self::Fixed(config.max_reply_delay_ms)
        } else {
            Self::Uniform {
                min_ms: config.min_reply_delay_ms,
                max_ms: config.max_reply_delay_ms,
            }
        }
    }

    fn sample_ms(self) -> u64 {
        match self {
            Self::None => 0,
            Self::Fixed(ms) => ms,
            Self::Uniform { min_ms, max_ms } => rand::thread_rng().gen_range(min_ms..=max_ms),
        }
    }
}

/// What one turn of the state machine produced
struct TurnOutcome {
    response: String,
    booking: Option<BookingRequest>,
}

impl TurnOutcome {
    fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            booking: None,
        }
    }
}

/// Deterministic receptionist backed by the rule table
pub struct SimulatedReceptionist {
    sessions: Arc<SessionStore>,
    business: BusinessConfig,
    delay: ReplyDelay,
    fail_requests: bool,
    stats: Mutex<ReceptionistStats>,
}

impl SimulatedReceptionist {
    /// Create a receptionist over a shared session store
    #[must_use]
    pub fn new(
        sessions: Arc<SessionStore>,
        receptionist: &ReceptionistConfig,
        business: BusinessConfig,
    ) -> Self {
        Self {
            sessions,
            business,
            delay: ReplyDelay::from_config(receptionist),
            fail_requests: receptionist.simulate_failures,
            stats: Mutex::new(ReceptionistStats::default()),
        }
    }

    /// Override the reply delay
    #[must_use]
    pub const fn with_delay(mut self, delay: ReplyDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Make every request fail with a retryable error
    #[must_use]
    pub const fn with_failures(mut self, fail: bool) -> Self {
        self.fail_requests = fail;
        self
    }
}

#[async_trait]
impl ReceptionistService for SimulatedReceptionist {
    async fn respond(
        &self,
        session_id: Option<&str>,
        utterance: &str,
    ) -> DialogueResult<ReceptionistReply> {
        let started = Instant::now();

        if utterance.chars().count() > MAX_UTTERANCE_CHARS {
            self.stats.lock().record_failure();
            return Err(DialogueError::invalid_utterance(format!(
                "utterance exceeds {MAX_UTTERANCE_CHARS} characters"
            )));
        }

        let session_id = self.sessions.ensure(session_id);
        self.sessions
            .record_turn(&session_id, ConversationTurn::user(utterance.trim()))?;

        let wait_ms = self.delay.sample_ms();
        if wait_ms > 0 {
            sleep(Duration::from_millis(wait_ms)).await;
        }

        if self.fail_requests {
            let apology = ConversationTurn {
                timestamp: Utc::now(),
                role: TurnRole::Bot,
                content: APOLOGY_RESPONSE.to_string(),
                intent: Some(Intent::Error.label().to_string()),
                confidence: None,
            };
            self.sessions.record_turn(&session_id, apology)?;
            self.stats.lock().record_failure();
            metrics::counter!("receptionist_failures_total").increment(1);
            tracing::warn!(session_id = %session_id, "simulated receptionist failure");
            return Err(DialogueError::responder_unavailable(
                "simulated receptionist outage",
            ));
        }

        let entities = extract_entities(utterance);
        let matched = match_utterance(utterance);

        let (response, state, request) = self.sessions.with_session(&session_id, |session| {
            session.current_intent = Some(matched.intent.label().to_string());
            let outcome = advance(session, &matched, utterance, &entities, &self.business);
            (outcome.response, session.stage, outcome.booking)
        })?;

        self.sessions.record_turn(
            &session_id,
            ConversationTurn::bot(response.as_str(), matched.intent, matched.confidence),
        )?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        {
            let mut stats = self.stats.lock();
            stats.record_success(elapsed_ms);
            if request.is_some() {
                stats.record_booking();
            }
        }
        metrics::counter!("receptionist_replies_total", "intent" => matched.intent.label())
            .increment(1);
        metrics::histogram!("receptionist_reply_latency_ms").record(elapsed_ms);

        tracing::debug!(
            session_id = %session_id,
            intent = matched.intent.label(),
            state = %state,
            booked = request.is_some(),
            "reply produced"
        );

        Ok(ReceptionistReply {
            session_id,
            response,
            intent: matched.intent,
            confidence: matched.confidence,
            state,
            entities,
            booking: request,
        })
    }

    async fn health_check(&self) -> ServiceHealth {
        if self.fail_requests {
            ServiceHealth::unhealthy("failure simulation enabled")
        } else {
            ServiceHealth::healthy(format!("{} intent rules loaded", RULE_TABLE.len()))
        }
    }

    async fn get_stats(&self) -> ReceptionistStats {
        self.stats.lock().clone()
    }

    fn service_name(&self) -> &str {
        "simulated-receptionist"
    }
}

/// Advance one conversation turn
///
/// Outside the booking flow every intent answers with its canned rule text.
/// During the booking flow the reply text is replaced by prompts and the
/// confirmation summary; the matched intent and confidence pass through
/// untouched either way.
fn advance(
    session: &mut DialogueSession,
    matched: &MatchResult,
    utterance: &str,
    entities: &ExtractedEntities,
    business: &BusinessConfig,
) -> TurnOutcome {
    match session.stage {
        DialogueStage::Initial | DialogueStage::Completed => {
            if matched.intent == Intent::AppointmentBooking {
                if session.stage == DialogueStage::Completed {
                    // Returning caller keeps contact details, not the old slot
                    session.booking.service = None;
                    session.booking.date = None;
                    session.booking.time = None;
                }
                session.stage = DialogueStage::CollectingInfo;
                session.pending = None;
                session.booking.absorb(entities);
                if session.booking.is_complete() {
                    session.stage = DialogueStage::Confirming;
                    TurnOutcome::text(session.booking.confirmation_summary())
                } else {
                    TurnOutcome::text(matched.response)
                }
            } else {
                if matched.intent == Intent::Goodbye {
                    session.stage = DialogueStage::Completed;
                }
                TurnOutcome::text(matched.response)
            }
        }
        DialogueStage::CollectingInfo => match matched.intent {
            Intent::BusinessHours
            | Intent::Services
            | Intent::Pricing
            | Intent::Location
            | Intent::Contact => {
                // Side question answered without losing booking progress
                TurnOutcome::text(matched.response)
            }
            Intent::Goodbye => {
                session.stage = DialogueStage::Completed;
                session.pending = None;
                TurnOutcome::text(matched.response)
            }
            _ => {
                session
                    .booking
                    .absorb_reply(session.pending, utterance, entities, business);
                advance_collection(session, business)
            }
        },
        DialogueStage::Confirming => {
            let folded = normalize_utterance(utterance);
            if booking::is_affirmative(&folded) {
                match session.booking.to_request() {
                    Some(request) => {
                        session.stage = DialogueStage::Completed;
                        session.pending = None;
                        TurnOutcome {
                            response: booking::booked_reply(&request),
                            booking: Some(request),
                        }
                    }
                    None => {
                        session.stage = DialogueStage::CollectingInfo;
                        advance_collection(session, business)
                    }
                }
            } else if matched.intent == Intent::Goodbye {
                session.stage = DialogueStage::Completed;
                session.pending = None;
                TurnOutcome::text(matched.response)
            } else {
                // Treat the reply as a correction and read the summary back
                session.booking.correct(entities);
                TurnOutcome::text(session.booking.confirmation_summary())
            }
        }
    }
}

/// Prompt for the next missing field or move to confirmation
fn advance_collection(session: &mut DialogueSession, business: &BusinessConfig) -> TurnOutcome {
    if let Some(field) = session.booking.next_missing() {
        session.pending = Some(field);
        TurnOutcome::text(booking::prompt_for(field, &session.booking, business))
    } else {
        session.stage = DialogueStage::Confirming;
        session.pending = None;
        TurnOutcome::text(session.booking.confirmation_summary())
    }
}
