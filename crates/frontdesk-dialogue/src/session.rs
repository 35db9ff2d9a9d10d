//! Conversation sessions and the in-memory session store

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use frontdesk_core::config::SessionConfig;
use frontdesk_core::types::{ConversationTurn, Intent, TurnRole};
use frontdesk_core::utils::{generate_session_id, validate_session_id};
use frontdesk_nlu::WELCOME_RESPONSE;
use serde::{Deserialize, Serialize};

use crate::booking::{BookingDetails, BookingField};
use crate::error::{DialogueError, DialogueResult};

/// Where a conversation currently stands
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStage {
    /// No booking in progress
    #[default]
    Initial,
    /// Collecting booking details one field at a time
    CollectingInfo,
    /// Details read back, waiting for the caller to confirm
    Confirming,
    /// Conversation wrapped up (booked or said goodbye)
    Completed,
}

impl DialogueStage {
    /// Stage label as serialized on the wire
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::CollectingInfo => "collecting_info",
            Self::Confirming => "confirming",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for DialogueStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// State of a single conversation
#[derive(Debug, Clone, Serialize)]
pub struct DialogueSession {
    /// Session identifier
    pub id: String,
    /// Current conversation stage
    pub stage: DialogueStage,
    /// Label of the most recently matched intent
    pub current_intent: Option<String>,
    /// Booking details collected so far
    pub booking: BookingDetails,
    /// Field the last bot turn prompted for, if it was a prompt
    #[serde(skip)]
    pub pending: Option<BookingField>,
    /// Conversation transcript, oldest first
    pub history: Vec<ConversationTurn>,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last time the caller or the receptionist spoke
    pub last_activity: DateTime<Utc>,
}

impl DialogueSession {
    /// Create a session opening with the receptionist's greeting
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        let welcome = ConversationTurn {
            timestamp: now,
            role: TurnRole::Bot,
            content: WELCOME_RESPONSE.to_string(),
            intent: Some(Intent::Greeting.label().to_string()),
            confidence: None,
        };

        Self {
            id: id.into(),
            stage: DialogueStage::Initial,
            current_intent: None,
            booking: BookingDetails::default(),
            pending: None,
            history: vec![welcome],
            created_at: now,
            last_activity: now,
        }
    }

    /// Append a turn, dropping the oldest once the transcript cap is hit
    pub fn record_turn(&mut self, turn: ConversationTurn, max_history: usize) {
        self.history.push(turn);
        if self.history.len() > max_history {
            let excess = self.history.len() - max_history;
            self.history.drain(..excess);
        }
        self.last_activity = Utc::now();
    }
}

/// Session summary returned over the API
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Session identifier
    pub session_id: String,
    /// Current conversation stage
    pub state: DialogueStage,
    /// Label of the most recently matched intent
    pub current_intent: Option<String>,
    /// Booking details collected so far
    pub booking: BookingDetails,
    /// Number of recorded turns
    pub turn_count: usize,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last time either side spoke
    pub last_activity: DateTime<Utc>,
    /// Conversation transcript, oldest first
    pub history: Vec<ConversationTurn>,
}

impl From<&DialogueSession> for SessionInfo {
    fn from(session: &DialogueSession) -> Self {
        Self {
            session_id: session.id.clone(),
            state: session.stage,
            current_intent: session.current_intent.clone(),
            booking: session.booking.clone(),
            turn_count: session.history.len(),
            created_at: session.created_at,
            last_activity: session.last_activity,
            history: session.history.clone(),
        }
    }
}

/// Concurrent store of live conversation sessions
///
/// Sessions are keyed by id and expire after a configurable quiet period.
/// Expiry is driven by a periodic sweep, not by reads.
pub struct SessionStore {
    sessions: DashMap<String, DialogueSession>,
    max_history_turns: usize,
    max_age: Duration,
    idle_warning: Duration,
}

impl SessionStore {
    /// Create an empty store with limits taken from configuration
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            max_history_turns: config.max_history_turns,
            max_age: Duration::hours(i64::try_from(config.max_age_hours).unwrap_or(i64::MAX)),
            idle_warning: Duration::seconds(
                i64::try_from(config.idle_warning_seconds).unwrap_or(i64::MAX),
            ),
        }
    }

    /// Resolve a session id, creating the session if needed
    ///
    /// A well-formed caller-supplied id is honored even when unknown, so a
    /// client can keep its id across a server restart. Malformed ids are
    /// discarded and a fresh one is generated.
    pub fn ensure(&self, requested: Option<&str>) -> String {
        let id = match requested {
            Some(id) if validate_session_id(id) => id.to_string(),
            Some(id) => {
                tracing::debug!(rejected = %id, "malformed session id, generating a new one");
                generate_session_id()
            }
            None => generate_session_id(),
        };

        self.sessions
            .entry(id.clone())
            .or_insert_with(|| DialogueSession::new(id.clone()));
        id
    }

    /// Run a closure against a session, failing if the id is unknown
    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut DialogueSession) -> T,
    ) -> DialogueResult<T> {
        self.sessions.get_mut(session_id).map_or_else(
            || Err(DialogueError::session_not_found(session_id)),
            |mut session| Ok(f(&mut session)),
        )
    }

    /// Append a turn to a session's transcript
    pub fn record_turn(&self, session_id: &str, turn: ConversationTurn) -> DialogueResult<()> {
        let max_history = self.max_history_turns;
        self.with_session(session_id, |session| {
            session.record_turn(turn, max_history);
        })
    }

    /// Snapshot a session for the API
    #[must_use]
    pub fn get_info(&self, session_id: &str) -> Option<SessionInfo> {
        self.sessions
            .get(session_id)
            .map(|session| SessionInfo::from(&*session))
    }

    /// Drop a session, returning whether it existed
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Replace a session with a fresh one under the same id
    ///
    /// The fresh session opens with the greeting turn again; collected
    /// booking details and history are discarded.
    pub fn reset(&self, session_id: &str) -> DialogueResult<SessionInfo> {
        match self.sessions.get_mut(session_id) {
            Some(mut entry) => {
                *entry = DialogueSession::new(session_id);
                Ok(SessionInfo::from(&*entry))
            }
            None => Err(DialogueError::session_not_found(session_id)),
        }
    }

    /// Sweep out sessions quiet for longer than the configured age
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.signed_duration_since(session.last_activity) <= self.max_age);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::info!(removed, remaining = self.sessions.len(), "expired sessions cleaned up");
        }
        removed
    }

    /// Number of sessions quiet past the idle warning threshold
    #[must_use]
    pub fn idle_count(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .iter()
            .filter(|entry| now.signed_duration_since(entry.last_activity) > self.idle_warning)
            .count()
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> SessionStore {
        SessionStore::new(&SessionConfig::default())
    }

    #[test]
    fn new_session_opens_with_the_greeting() {
        let store = store();
        let id = store.ensure(None);
        assert!(id.starts_with("sess_"));

        let info = store.get_info(&id).unwrap();
        assert_eq!(info.state, DialogueStage::Initial);
        assert_eq!(info.turn_count, 1);

        let welcome = &info.history[0];
        assert_eq!(welcome.role, TurnRole::Bot);
        assert_eq!(welcome.content, WELCOME_RESPONSE);
        assert_eq!(welcome.intent.as_deref(), Some("greeting"));
        assert!(welcome.confidence.is_none());
    }

    #[test]
    fn ensure_reuses_an_existing_session() {
        let store = store();
        let id = store.ensure(None);
        store
            .record_turn(&id, ConversationTurn::user("hello"))
            .unwrap();

        let again = store.ensure(Some(&id));
        assert_eq!(again, id);
        assert_eq!(store.get_info(&id).unwrap().turn_count, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ensure_honors_a_caller_supplied_id() {
        let store = store();
        let id = store.ensure(Some("client-session_42"));
        assert_eq!(id, "client-session_42");
        assert!(store.get_info("client-session_42").is_some());
    }

    #[test]
    fn ensure_discards_a_malformed_id() {
        let store = store();
        let id = store.ensure(Some("not a valid id!"));
        assert_ne!(id, "not a valid id!");
        assert!(id.starts_with("sess_"));
        assert!(store.get_info("not a valid id!").is_none());
    }

    #[test]
    fn transcript_is_capped_at_the_configured_length() {
        let config = SessionConfig {
            max_history_turns: 5,
            ..Default::default()
        };
        let store = SessionStore::new(&config);
        let id = store.ensure(None);

        for n in 1..=10 {
            store
                .record_turn(&id, ConversationTurn::user(format!("turn {n}")))
                .unwrap();
        }

        let info = store.get_info(&id).unwrap();
        assert_eq!(info.turn_count, 5);
        // The greeting and the earliest turns were dropped
        assert_eq!(info.history[0].content, "turn 6");
        assert_eq!(info.history[4].content, "turn 10");
    }

    #[test]
    fn unknown_session_is_an_error() {
        let store = store();
        let err = store
            .with_session("sess_missing", |_| ())
            .unwrap_err();
        assert!(matches!(err, DialogueError::SessionNotFound { .. }));
    }

    #[test]
    fn cleanup_removes_only_stale_sessions() {
        let store = store();
        let stale = store.ensure(None);
        let fresh = store.ensure(None);

        store
            .with_session(&stale, |session| {
                session.last_activity = Utc::now() - Duration::hours(25);
            })
            .unwrap();

        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.get_info(&stale).is_none());
        assert!(store.get_info(&fresh).is_some());
    }

    #[test]
    fn remove_reports_whether_the_session_existed() {
        let store = store();
        let id = store.ensure(None);
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn reset_discards_history_but_keeps_the_id() {
        let store = store();
        let id = store.ensure(None);
        store
            .record_turn(&id, ConversationTurn::user("book an appointment"))
            .unwrap();
        store
            .with_session(&id, |session| {
                session.stage = DialogueStage::CollectingInfo;
            })
            .unwrap();

        let info = store.reset(&id).unwrap();
        assert_eq!(info.session_id, id);
        assert_eq!(info.state, DialogueStage::Initial);
        assert_eq!(info.turn_count, 1);
        assert_eq!(info.history[0].content, WELCOME_RESPONSE);

        let err = store.reset("sess_missing").unwrap_err();
        assert!(matches!(err, DialogueError::SessionNotFound { .. }));
    }

    #[test]
    fn idle_count_tracks_quiet_sessions() {
        let config = SessionConfig {
            idle_warning_seconds: 60,
            ..Default::default()
        };
        let store = SessionStore::new(&config);
        let quiet = store.ensure(None);
        store.ensure(None);

        assert_eq!(store.idle_count(), 0);

        store
            .with_session(&quiet, |session| {
                session.last_activity = Utc::now() - Duration::seconds(120);
            })
            .unwrap();
        assert_eq!(store.idle_count(), 1);
    }

    #[test]
    fn stage_serializes_in_snake_case() {
        let value = serde_json::to_value(DialogueStage::CollectingInfo).unwrap();
        assert_eq!(value, serde_json::json!("collecting_info"));
        assert_eq!(DialogueStage::Confirming.to_string(), "confirming");
    }
}
