//! Core types shared across the Frontdesk receptionist console

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Intent labels recognized by the console for display purposes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Conversation opener (welcome message)
    Greeting,
    /// Caller wants to schedule an appointment
    AppointmentBooking,
    /// Caller asks about opening hours
    BusinessHours,
    /// Caller asks what the business offers
    Services,
    /// Caller asks about prices
    Pricing,
    /// Caller asks where the business is
    Location,
    /// Caller asks how to reach the business
    Contact,
    /// Caller is wrapping up the conversation
    Goodbye,
    /// No rule matched the utterance
    Unknown,
    /// The reply pipeline failed and an apology was substituted
    Error,
}

impl Intent {
    /// All intents in the display set, in badge-legend order
    pub const ALL: [Self; 10] = [
        Self::Greeting,
        Self::AppointmentBooking,
        Self::BusinessHours,
        Self::Services,
        Self::Pricing,
        Self::Location,
        Self::Contact,
        Self::Goodbye,
        Self::Unknown,
        Self::Error,
    ];

    /// Neutral badge style applied to labels outside the display set
    pub const DEFAULT_BADGE_STYLE: &'static str = "bg-gray-100 text-gray-800";

    /// Wire label for this intent (snake_case, matches serde)
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::AppointmentBooking => "appointment_booking",
            Self::BusinessHours => "business_hours",
            Self::Services => "services",
            Self::Pricing => "pricing",
            Self::Location => "location",
            Self::Contact => "contact",
            Self::Goodbye => "goodbye",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }

    /// Human-readable name shown inside the badge (underscores become spaces)
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AppointmentBooking => "appointment booking",
            Self::BusinessHours => "business hours",
            other => other.label(),
        }
    }

    /// Badge style (CSS utility classes) for this intent
    #[must_use]
    pub const fn badge_style(self) -> &'static str {
        match self {
            Self::Greeting => "bg-blue-100 text-blue-800",
            Self::AppointmentBooking => "bg-green-100 text-green-800",
            Self::BusinessHours => "bg-purple-100 text-purple-800",
            Self::Services => "bg-yellow-100 text-yellow-800",
            Self::Pricing => "bg-orange-100 text-orange-800",
            Self::Location => "bg-pink-100 text-pink-800",
            Self::Contact => "bg-gray-100 text-gray-800",
            Self::Goodbye => "bg-indigo-100 text-indigo-800",
            Self::Unknown | Self::Error => "bg-red-100 text-red-800",
        }
    }

    /// Parse a wire label back into an intent, if it is in the display set
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.label() == label)
    }

    /// Badge style for an arbitrary label
    ///
    /// Labels outside the display set get the neutral default so every call
    /// record renders, including labels from earlier product generations
    /// (e.g. `appointment_cancel`).
    #[must_use]
    pub fn badge_style_for_label(label: &str) -> &'static str {
        Self::from_label(label).map_or(Self::DEFAULT_BADGE_STYLE, Self::badge_style)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of matching one utterance against the rule table
///
/// Produced fresh per invocation and never stored by the matcher itself.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MatchResult {
    /// Canned reply text for the matched rule
    pub response: &'static str,
    /// Intent label of the matched rule
    pub intent: Intent,
    /// Confidence assigned to the matched rule, in [0, 1]
    pub confidence: f32,
}

/// Status of a logged call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Call is in progress
    Active,
    /// Call ended normally
    Completed,
    /// Call ended abnormally
    Failed,
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One entry in the call log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRecord {
    /// Record identifier
    pub id: Uuid,

    /// Conversation session this call belongs to
    pub session_id: String,

    /// Caller's name, if they gave one
    pub caller_name: Option<String>,
    /// Caller's phone number, if known
    pub caller_phone: Option<String>,
    /// Caller's email address, if known
    pub caller_email: Option<String>,

    /// When the call started
    pub start_time: DateTime<Utc>,
    /// When the call ended (None while active)
    pub end_time: Option<DateTime<Utc>>,
    /// Call length in seconds once ended
    pub duration_seconds: Option<i64>,

    /// Lifecycle status
    pub status: CallStatus,

    /// Dominant intent label for the call
    ///
    /// Free-form on purpose: historical records may carry labels outside the
    /// current display set.
    pub primary_intent: Option<String>,

    /// One-line summary of the conversation
    pub conversation_summary: Option<String>,

    /// Whether an appointment was booked during the call
    pub appointment_booked: bool,
    /// Whether the caller qualified as a lead
    pub lead_qualified: bool,
    /// Whether staff should follow up
    pub follow_up_required: bool,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl CallRecord {
    /// Create a new active call record for a session
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.into(),
            caller_name: None,
            caller_phone: None,
            caller_email: None,
            start_time: now,
            end_time: None,
            duration_seconds: None,
            status: CallStatus::Active,
            primary_intent: None,
            conversation_summary: None,
            appointment_booked: false,
            lead_qualified: false,
            follow_up_required: false,
            created_at: now,
        }
    }

    /// Badge style for this record's primary intent (neutral if unmapped)
    #[must_use]
    pub fn intent_badge_style(&self) -> &'static str {
        self.primary_intent
            .as_deref()
            .map_or(Intent::DEFAULT_BADGE_STYLE, Intent::badge_style_for_label)
    }
}

/// Lifecycle status of an appointment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked but not yet confirmed
    Scheduled,
    /// Confirmed by the customer
    Confirmed,
    /// Visit took place
    Completed,
    /// Called off
    Cancelled,
}

impl AppointmentStatus {
    /// Whether the status admits no further transitions
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a transition to `next` is allowed
    ///
    /// Scheduled may confirm or cancel; confirmed may complete or cancel;
    /// terminal states are frozen.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Scheduled => matches!(next, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => matches!(next, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Scheduled
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A booked appointment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Record identifier
    pub id: Uuid,

    /// Customer name
    pub customer_name: String,
    /// Customer phone number
    pub customer_phone: Option<String>,
    /// Customer email address
    pub customer_email: Option<String>,

    /// Service being booked
    pub service_type: String,

    /// Calendar date of the visit
    pub scheduled_date: NaiveDate,
    /// Time of day of the visit
    pub scheduled_time: NaiveTime,
    /// Planned length in minutes
    pub duration_minutes: u32,

    /// Lifecycle status
    pub status: AppointmentStatus,

    /// Free-form notes (access needs, preferences, ...)
    pub notes: Option<String>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The caller
    User,
    /// The receptionist
    Bot,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// One message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// When the turn happened
    pub timestamp: DateTime<Utc>,
    /// Speaker
    pub role: TurnRole,
    /// Message text
    pub content: String,
    /// Intent attached to bot turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Confidence attached to bot turns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl ConversationTurn {
    /// Create a user turn
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            role: TurnRole::User,
            content: content.into(),
            intent: None,
            confidence: None,
        }
    }

    /// Create a bot turn tagged with intent and confidence
    #[must_use]
    pub fn bot(content: impl Into<String>, intent: Intent, confidence: f32) -> Self {
        Self {
            timestamp: Utc::now(),
            role: TurnRole::Bot,
            content: content.into(),
            intent: Some(intent.label().to_string()),
            confidence: Some(confidence),
        }
    }
}

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// When the response was generated
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Successful response with payload
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful response with payload and message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Standard API error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable upper-snake error code
    pub code: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Pagination information for list responses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Whether there are more results after this page
    pub has_next: bool,
    /// Whether there are results before this page
    pub has_prev: bool,
    /// Offset of the next page, if any
    pub next_offset: Option<i64>,
    /// Offset of the previous page, if any
    pub prev_offset: Option<i64>,
}

impl PaginationInfo {
    /// Compute pagination info from offset, page size and total count
    #[must_use]
    pub const fn compute(offset: i64, limit: i64, total: i64) -> Self {
        let has_next = offset + limit < total;
        let has_prev = offset > 0;
        Self {
            has_next,
            has_prev,
            next_offset: if has_next { Some(offset + limit) } else { None },
            prev_offset: if has_prev {
                let prev = offset - limit;
                Some(if prev > 0 { prev } else { 0 })
            } else {
                None
            },
        }
    }
}
