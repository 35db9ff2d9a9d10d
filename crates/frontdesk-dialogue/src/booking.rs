//! Appointment booking flow: slot filling, prompts and confirmation

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use frontdesk_core::config::BusinessConfig;
use frontdesk_nlu::ExtractedEntities;
use serde::{Deserialize, Serialize};

/// Hours offered for appointments (9-11 AM, 2-4 PM)
const SLOT_HOURS: [u32; 6] = [9, 10, 11, 14, 15, 16];

/// Phrases that count as confirming the booking summary
const AFFIRMATIVES: [&str; 7] = [
    "yes",
    "yep",
    "yeah",
    "correct",
    "confirm",
    "sounds good",
    "that's right",
];

/// Booking details collected one field at a time
///
/// Fields fill from extracted entities first, then from bare answers to the
/// pending prompt. A filled field is never overwritten by later entities;
/// corrections happen only at the confirmation step.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingDetails {
    /// Customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Customer phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Customer email address (optional, never prompted for)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Requested service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Requested date, as the caller phrased it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Requested time, as the caller phrased it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// A booking slot still to be filled, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    /// Customer name
    Name,
    /// Customer phone number
    Phone,
    /// Requested service
    Service,
    /// Requested date
    Date,
    /// Requested time
    Time,
}

impl BookingDetails {
    /// Fill still-empty fields from extracted entities
    pub fn absorb(&mut self, entities: &ExtractedEntities) {
        if self.name.is_none() {
            self.name.clone_from(&entities.name);
        }
        if self.phone.is_none() {
            self.phone.clone_from(&entities.phone);
        }
        if self.email.is_none() {
            self.email.clone_from(&entities.email);
        }
        if self.service.is_none() {
            self.service = entities.service.as_deref().map(capitalize_first);
        }
        if self.date.is_none() {
            self.date.clone_from(&entities.date);
        }
        if self.time.is_none() {
            self.time.clone_from(&entities.time);
        }
    }

    /// Absorb a reply given while a specific field was being prompted for
    ///
    /// Entities fill whatever they can; if the pending field is still empty
    /// afterwards, the utterance itself is tried as a bare answer. A caller
    /// answering "May I have your name please?" with just "John Smith" has
    /// no entity pattern to hit, so the utterance is the answer.
    pub fn absorb_reply(
        &mut self,
        pending: Option<BookingField>,
        utterance: &str,
        entities: &ExtractedEntities,
        business: &BusinessConfig,
    ) {
        self.absorb(entities);

        let Some(field) = pending else { return };
        let trimmed = utterance.trim();

        match field {
            BookingField::Name if self.name.is_none() => {
                if looks_like_name(trimmed) {
                    self.name = Some(title_case(trimmed));
                }
            }
            BookingField::Phone if self.phone.is_none() => {
                let digits = trimmed.chars().filter(char::is_ascii_digit).count();
                if (7..=15).contains(&digits) {
                    self.phone = Some(trimmed.to_string());
                }
            }
            BookingField::Service if self.service.is_none() => {
                let folded = trimmed.to_lowercase();
                if let Some(service) = business
                    .services
                    .iter()
                    .find(|s| folded.contains(&s.to_lowercase()))
                {
                    self.service = Some(service.clone());
                }
            }
            _ => {}
        }
    }

    /// Overwrite fields from entities, used for corrections at confirmation
    pub fn correct(&mut self, entities: &ExtractedEntities) {
        if entities.name.is_some() {
            self.name.clone_from(&entities.name);
        }
        if entities.phone.is_some() {
            self.phone.clone_from(&entities.phone);
        }
        if entities.email.is_some() {
            self.email.clone_from(&entities.email);
        }
        if entities.service.is_some() {
            self.service = entities.service.as_deref().map(capitalize_first);
        }
        if entities.date.is_some() {
            self.date.clone_from(&entities.date);
        }
        if entities.time.is_some() {
            self.time.clone_from(&entities.time);
        }
    }

    /// The next field to prompt for, in name, phone, service, date, time order
    #[must_use]
    pub const fn next_missing(&self) -> Option<BookingField> {
        if self.name.is_none() {
            Some(BookingField::Name)
        } else if self.phone.is_none() {
            Some(BookingField::Phone)
        } else if self.service.is_none() {
            Some(BookingField::Service)
        } else if self.date.is_none() {
            Some(BookingField::Date)
        } else if self.time.is_none() {
            Some(BookingField::Time)
        } else {
            None
        }
    }

    /// Whether every prompted field has been collected
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    /// Confirmation summary read back before booking
    #[must_use]
    pub fn confirmation_summary(&self) -> String {
        format!(
            "Perfect! Let me confirm your appointment details:\n\n\
             Name: {}\n\
             Phone: {}\n\
             Service: {}\n\
             Date: {}\n\
             Time: {}\n\n\
             Is this information correct? If yes, I'll book this appointment for you.",
            self.name.as_deref().unwrap_or_default(),
            self.phone.as_deref().unwrap_or_default(),
            self.service.as_deref().unwrap_or_default(),
            self.date.as_deref().unwrap_or_default(),
            self.time.as_deref().unwrap_or_default(),
        )
    }

    /// Assemble a booking request once all prompted fields are present
    #[must_use]
    pub fn to_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            customer_name: self.name.clone()?,
            customer_phone: self.phone.clone()?,
            customer_email: self.email.clone(),
            service_type: self.service.clone()?,
            requested_date: self.date.clone()?,
            requested_time: self.time.clone()?,
        })
    }
}

/// A completed booking handed off for persistence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    /// Customer name
    pub customer_name: String,
    /// Customer phone number
    pub customer_phone: String,
    /// Customer email, if the caller mentioned one
    pub customer_email: Option<String>,
    /// Requested service
    pub service_type: String,
    /// Requested date, as phrased by the caller
    pub requested_date: String,
    /// Requested time, as phrased by the caller
    pub requested_time: String,
}

/// Prompt text for a missing booking field
#[must_use]
pub fn prompt_for(field: BookingField, details: &BookingDetails, business: &BusinessConfig) -> String {
    match field {
        BookingField::Name => {
            "I'd be happy to help you schedule an appointment. May I have your name please?"
                .to_string()
        }
        BookingField::Phone => format!(
            "Thank you, {}. Could you please provide your phone number?",
            details.name.as_deref().unwrap_or_default()
        ),
        BookingField::Service => format!(
            "What type of service would you like to schedule? We offer: {}.",
            business.services.join(", ")
        ),
        BookingField::Date => {
            "What date would you prefer for your appointment? I can check our availability."
                .to_string()
        }
        BookingField::Time => {
            "What time would work best for you? We have morning, afternoon, and early evening slots available."
                .to_string()
        }
    }
}

/// Reply sent after a booking is confirmed and recorded
#[must_use]
pub fn booked_reply(request: &BookingRequest) -> String {
    format!(
        "Excellent! Your {} appointment is booked for {} at {}. We'll reach you at {} if anything changes. Is there anything else I can help you with?",
        request.service_type, request.requested_date, request.requested_time, request.customer_phone
    )
}

/// Whether a folded utterance confirms the booking summary
#[must_use]
pub fn is_affirmative(folded: &str) -> bool {
    AFFIRMATIVES.iter().any(|phrase| folded.contains(phrase))
}

/// Open appointment slots over the next week
///
/// Starts tomorrow, runs seven days, skips Sundays, offers 9-11 AM and
/// 2-4 PM on the hour. Formatted as `YYYY-MM-DD HH:MM`.
#[must_use]
pub fn available_slots(from: DateTime<Utc>) -> Vec<String> {
    let base = from + Duration::days(1);
    let mut slots = Vec::new();

    for day in 0..7 {
        let date = (base + Duration::days(day)).date_naive();
        if date.weekday() == Weekday::Sun {
            continue;
        }
        for hour in SLOT_HOURS {
            if let Some(slot) = date.and_hms_opt(hour, 0, 0) {
                slots.push(slot.format("%Y-%m-%d %H:%M").to_string());
            }
        }
    }

    slots
}

/// Whether a bare utterance plausibly is just a spoken name
fn looks_like_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw.split_whitespace().count() <= 4
        && raw
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '\'' || c == '-' || c == '.')
}

/// Uppercase the first letter of each word
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
