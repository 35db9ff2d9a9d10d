//! Ordered rule table mapping utterances to intents and canned replies

use frontdesk_core::types::{Intent, MatchResult};
use frontdesk_core::utils::normalize_utterance;

/// One rule in the matcher table
///
/// Rules are checked in table order; the first rule with any trigger
/// contained in the folded utterance wins, even when triggers of later
/// rules also appear. Reordering the table changes behavior.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    /// Trigger phrases, lowercase, compared by substring containment
    pub triggers: &'static [&'static str],
    /// Intent this rule resolves to
    pub intent: Intent,
    /// Confidence reported for this rule
    pub confidence: f32,
    /// Canned reply text for this rule
    pub response: &'static str,
}

/// The matcher table, highest priority first
pub static RULE_TABLE: [IntentRule; 7] = [
    IntentRule {
        triggers: &["appointment", "book", "schedule"],
        intent: Intent::AppointmentBooking,
        confidence: 0.95,
        response: "I'd be happy to help you schedule an appointment. What type of service are you looking for, and when would you prefer to come in?",
    },
    IntentRule {
        triggers: &["hours", "open", "close"],
        intent: Intent::BusinessHours,
        confidence: 0.92,
        response: "Our business hours are Monday through Friday, 9 AM to 6 PM, and Saturday 9 AM to 3 PM. We're closed on Sundays. Is there anything else I can help you with?",
    },
    IntentRule {
        triggers: &["service", "what do you do", "offer"],
        intent: Intent::Services,
        confidence: 0.88,
        response: "We offer a variety of services including Consultation, Treatment, and Follow-up appointments. Would you like more information about any specific service?",
    },
    IntentRule {
        triggers: &["price", "cost", "fee"],
        intent: Intent::Pricing,
        confidence: 0.85,
        response: "Our pricing varies depending on the specific service you're interested in. Could you tell me which service you'd like to know about so I can provide accurate pricing information?",
    },
    IntentRule {
        triggers: &["location", "address", "where"],
        intent: Intent::Location,
        confidence: 0.90,
        response: "We're located at 123 Main Street, City, State 12345. Would you like me to provide directions or send you our location details?",
    },
    IntentRule {
        triggers: &["contact", "phone", "email"],
        intent: Intent::Contact,
        confidence: 0.87,
        response: "You can reach us at (555) 123-4567 or email us at info@yourbusiness.com. Is there anything specific you'd like to know or discuss?",
    },
    IntentRule {
        triggers: &["bye", "goodbye", "thanks"],
        intent: Intent::Goodbye,
        confidence: 0.93,
        response: "Thank you for contacting us! Have a wonderful day, and we look forward to serving you soon.",
    },
];

/// Reply used when no rule matches
pub const FALLBACK_RESPONSE: &str = "I understand you're asking about that. Could you please provide a bit more detail so I can better assist you?";

/// Confidence reported with the fallback reply
pub const FALLBACK_CONFIDENCE: f32 = 0.60;

/// Opening message shown before the caller says anything
pub const WELCOME_RESPONSE: &str =
    "Hello! I'm your AI voice receptionist. How can I help you today?";

/// Apology substituted when producing a reply fails
pub const APOLOGY_RESPONSE: &str =
    "I apologize, but I'm having trouble processing your request right now. Please try again.";

/// Utterances offered in the console as one-click test inputs
pub const SUGGESTED_UTTERANCES: [&str; 8] = [
    "I'd like to book an appointment",
    "What are your business hours?",
    "What services do you offer?",
    "How much does a consultation cost?",
    "Where are you located?",
    "What's your phone number?",
    "I need to cancel my appointment",
    "Thank you, goodbye",
];

/// Match an utterance against the rule table
///
/// The utterance is trimmed and case-folded, then scanned against
/// [`RULE_TABLE`] top to bottom. Total over arbitrary input: anything
/// without a trigger, including the empty string, resolves to
/// [`Intent::Unknown`] with the fallback reply.
#[must_use]
pub fn match_utterance(utterance: &str) -> MatchResult {
    let folded = normalize_utterance(utterance);

    for rule in &RULE_TABLE {
        if rule.triggers.iter().any(|trigger| folded.contains(trigger)) {
            return MatchResult {
                response: rule.response,
                intent: rule.intent,
                confidence: rule.confidence,
            };
        }
    }

    MatchResult {
        response: FALLBACK_RESPONSE,
        intent: Intent::Unknown,
        confidence: FALLBACK_CONFIDENCE,
    }
}
