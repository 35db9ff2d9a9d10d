//! Lightweight entity extraction from caller utterances
//!
//! Pattern-based pulls of time, date, name, phone, email and service
//! mentions. Used by the booking flow to pre-fill details so the caller is
//! not asked for things they already said.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)?\b",
        r"(?i)\b(\d{1,2})\s*(am|pm)\b",
        r"(?i)\b(morning|afternoon|evening|noon)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(today|tomorrow|yesterday)\b",
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b",
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bmy name is\s+([a-z\s]+)",
        r"(?i)\bi'm\s+([a-z\s]+)",
        r"(?i)\bthis is\s+([a-z\s]+)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",
        r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static EMAIL_PATTERN: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

/// Service keywords recognized in utterances, checked in order
const SERVICE_KEYWORDS: [&str; 7] = [
    "consultation",
    "checkup",
    "cleaning",
    "treatment",
    "therapy",
    "massage",
    "haircut",
];

/// Entities pulled out of a single utterance
///
/// Serializes to an empty object when nothing was found.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedEntities {
    /// Time mention, verbatim ("2:30 pm", "morning")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Date mention, verbatim ("tomorrow", "12/25/2026")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Caller name, title-cased
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Phone number, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Email address, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Service keyword, lowercase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ExtractedEntities {
    /// Whether no entity was found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.time.is_none()
            && self.date.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.service.is_none()
    }
}

fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| title_case(m.as_str()))
}

/// Uppercase the first letter of each word, lowercase the rest
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_service(folded: &str) -> Option<String> {
    SERVICE_KEYWORDS
        .iter()
        .find(|keyword| folded.contains(*keyword))
        .map(|keyword| (*keyword).to_string())
}

/// Extract all recognized entities from an utterance
#[must_use]
pub fn extract_entities(utterance: &str) -> ExtractedEntities {
    let folded = utterance.to_lowercase();

    ExtractedEntities {
        time: first_match(&TIME_PATTERNS, utterance),
        date: first_match(&DATE_PATTERNS, utterance),
        name: first_capture(&NAME_PATTERNS, utterance),
        phone: first_match(&PHONE_PATTERNS, utterance),
        email: first_match(&EMAIL_PATTERN, utterance),
        service: extract_service(&folded),
    }
}
