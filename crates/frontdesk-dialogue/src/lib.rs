//! Conversation sessions and the simulated receptionist service
//!
//! This crate drives the chat side of the console: it keeps per-session
//! dialogue state, runs utterances through the intent matcher, walks callers
//! through the appointment booking flow, and simulates the reply latency of
//! a live voice pipeline.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::significant_drop_tightening,
    clippy::uninlined_format_args
)]

pub mod booking;
pub mod error;
pub mod service;
pub mod session;
pub mod simulated;

pub use booking::{BookingDetails, BookingField, BookingRequest};
pub use error::{DialogueError, DialogueResult, ErrorSeverity};
pub use service::{ReceptionistReply, ReceptionistService, ReceptionistStats, ServiceHealth};
pub use session::{DialogueSession, DialogueStage, SessionInfo, SessionStore};
pub use simulated::{ReplyDelay, SimulatedReceptionist};
