//! Utility functions for the Frontdesk console

/// Normalize an utterance for matching: trim and case-fold
///
/// Total over arbitrary Unicode input. Matching always runs on the
/// normalized form so `"HOURS?"` and `"hours?"` behave identically.
#[must_use]
pub fn normalize_utterance(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Generate a unique session identifier
#[must_use]
pub fn generate_session_id() -> String {
    format!("sess_{}", uuid::Uuid::new_v4().simple())
}

/// Validate a client-supplied session identifier
#[must_use]
pub fn validate_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id.len() <= 100
        && session_id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Format a call duration in seconds as `m:ss`
///
/// Negative durations clamp to `0:00`.
#[must_use]
pub fn format_call_duration(seconds: i64) -> String {
    let total = seconds.max(0);
    let minutes = total / 60;
    let secs = total % 60;
    format!("{minutes}:{secs:02}")
}
