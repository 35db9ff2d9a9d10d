//! Intent matching and entity extraction for the Frontdesk receptionist
//!
//! The matcher is a fixed, ordered rule table: each rule carries trigger
//! phrases, an intent label, a confidence score and a canned reply. An
//! utterance is case-folded once and scanned top to bottom; the first rule
//! with any trigger appearing as a substring wins. No rule matching returns
//! the fallback. The function is pure and total, so the console behaves
//! identically for the same input every time.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod entities;
pub mod matcher;

pub use entities::{ExtractedEntities, extract_entities};
pub use matcher::{
    APOLOGY_RESPONSE, FALLBACK_CONFIDENCE, FALLBACK_RESPONSE, IntentRule, RULE_TABLE,
    SUGGESTED_UTTERANCES, WELCOME_RESPONSE, match_utterance,
};
