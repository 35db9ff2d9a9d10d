//! Error types for the dialogue service

use thiserror::Error;

/// Result type alias for dialogue operations
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors that can occur while driving a conversation
#[derive(Error, Debug)]
pub enum DialogueError {
    /// Session does not exist or has been cleaned up
    #[error("Session not found: {session_id}")]
    SessionNotFound {
        /// Session identifier
        session_id: String,
    },

    /// The reply pipeline is unavailable or failed mid-reply
    #[error("Receptionist unavailable: {message}")]
    ResponderUnavailable {
        /// Error message
        message: String,
    },

    /// Utterance failed validation before processing
    #[error("Invalid utterance: {message}")]
    InvalidUtterance {
        /// Error message
        message: String,
    },

    /// A booking could not be assembled from the collected details
    #[error("Booking rejected: {message}")]
    BookingRejected {
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DialogueError {
    /// Create a session not found error
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    /// Create a responder unavailable error
    pub fn responder_unavailable(message: impl Into<String>) -> Self {
        Self::ResponderUnavailable {
            message: message.into(),
        }
    }

    /// Create an invalid utterance error
    pub fn invalid_utterance(message: impl Into<String>) -> Self {
        Self::InvalidUtterance {
            message: message.into(),
        }
    }

    /// Create a booking rejected error
    pub fn booking_rejected(message: impl Into<String>) -> Self {
        Self::BookingRejected {
            message: message.into(),
        }
    }

    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ResponderUnavailable { .. })
    }

    /// Get error severity level for logging
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SessionNotFound { .. } | Self::InvalidUtterance { .. } => ErrorSeverity::Warning,
            Self::ResponderUnavailable { .. } => ErrorSeverity::Error,
            Self::BookingRejected { .. } | Self::Json(_) => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Informational - not really an error
    Info,
    /// Warning - should be investigated
    Warning,
    /// Error - operation failed but system continues
    Error,
}

// Conversions to core error types
impl From<DialogueError> for frontdesk_core::context_error::ContextError {
    fn from(err: DialogueError) -> Self {
        Self::with_context(err, "Dialogue service error")
    }
}

impl From<DialogueError> for frontdesk_core::Error {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::SessionNotFound { session_id } => Self::NotFound {
                resource: format!("Session {session_id}"),
            },
            other => Self::Session {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DialogueError::session_not_found("sess_123");
        assert!(matches!(err, DialogueError::SessionNotFound { .. }));

        let err = DialogueError::responder_unavailable("pipeline offline");
        assert!(matches!(err, DialogueError::ResponderUnavailable { .. }));

        let err = DialogueError::booking_rejected("missing phone");
        assert!(matches!(err, DialogueError::BookingRejected { .. }));
    }

    #[test]
    fn test_error_retryable() {
        let retryable = DialogueError::responder_unavailable("timeout");
        assert!(retryable.is_retryable());

        let not_retryable = DialogueError::session_not_found("sess_123");
        assert!(!not_retryable.is_retryable());
    }

    #[test]
    fn test_error_severity() {
        let warning = DialogueError::session_not_found("sess_123");
        assert_eq!(warning.severity(), ErrorSeverity::Warning);

        let error = DialogueError::responder_unavailable("down");
        assert_eq!(error.severity(), ErrorSeverity::Error);

        let info = DialogueError::booking_rejected("incomplete");
        assert_eq!(info.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_error_display() {
        let err = DialogueError::session_not_found("sess_abc");
        assert_eq!(format!("{err}"), "Session not found: sess_abc");

        let err = DialogueError::responder_unavailable("simulated failure");
        assert!(format!("{err}").contains("simulated failure"));
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err = DialogueError::session_not_found("sess_abc");
        let core: frontdesk_core::Error = err.into();
        assert!(matches!(core, frontdesk_core::Error::NotFound { .. }));

        let err = DialogueError::responder_unavailable("down");
        let core: frontdesk_core::Error = err.into();
        assert!(matches!(core, frontdesk_core::Error::Session { .. }));
    }
}
