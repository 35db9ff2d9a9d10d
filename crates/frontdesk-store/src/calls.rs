//! Call log store with filtering and CSV export

use chrono::{DateTime, Duration, Utc};
use frontdesk_core::error::{Error, Result};
use frontdesk_core::types::{CallRecord, CallStatus};
use parking_lot::RwLock;
use uuid::Uuid;

/// Filters applied when listing or exporting the call log
#[derive(Debug, Clone)]
pub struct CallFilter {
    /// Keep calls in this status
    pub status: Option<CallStatus>,
    /// Keep calls whose primary intent label equals this
    pub intent: Option<String>,
    /// Case-insensitive match against caller name, phone, email or summary
    pub search: Option<String>,
    /// Keep calls starting at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Keep calls starting at or before this instant
    pub to: Option<DateTime<Utc>>,
    /// Page size
    pub limit: usize,
    /// Rows to skip before the page
    pub offset: usize,
}

impl Default for CallFilter {
    fn default() -> Self {
        Self {
            status: None,
            intent: None,
            search: None,
            from: None,
            to: None,
            limit: 50,
            offset: 0,
        }
    }
}

impl CallFilter {
    fn matches(&self, call: &CallRecord) -> bool {
        if let Some(status) = self.status {
            if call.status != status {
                return false;
            }
        }
        if let Some(intent) = &self.intent {
            if call.primary_intent.as_deref() != Some(intent.as_str()) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if call.start_time < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if call.start_time > to {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = call
                .caller_name
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&term))
                || call.caller_phone.as_deref().is_some_and(|v| v.contains(&term))
                || call
                    .caller_email
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&term))
                || call
                    .conversation_summary
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// In-memory call log, newest first on reads
#[derive(Debug, Default)]
pub struct CallStore {
    calls: RwLock<Vec<CallRecord>>,
}

impl CallStore {
    /// Create an empty call log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its id
    pub fn insert(&self, record: CallRecord) -> Uuid {
        let id = record.id;
        self.calls.write().push(record);
        tracing::debug!(call_id = %id, "call record inserted");
        id
    }

    /// Page of matching calls plus the total matching count
    #[must_use]
    pub fn list(&self, filter: &CallFilter) -> (Vec<CallRecord>, usize) {
        let calls = self.calls.read();
        let mut matching: Vec<CallRecord> = calls
            .iter()
            .filter(|call| filter.matches(call))
            .cloned()
            .collect();
        drop(calls);

        matching.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();
        (page, total)
    }

    /// Look up a call by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<CallRecord> {
        self.calls.read().iter().find(|call| call.id == id).cloned()
    }

    /// Most recent call for a session
    #[must_use]
    pub fn get_by_session(&self, session_id: &str) -> Option<CallRecord> {
        self.calls
            .read()
            .iter()
            .filter(|call| call.session_id == session_id)
            .max_by_key(|call| call.start_time)
            .cloned()
    }

    /// Apply a mutation to a call by id
    pub fn update(&self, id: Uuid, f: impl FnOnce(&mut CallRecord)) -> Result<CallRecord> {
        let mut calls = self.calls.write();
        let call = calls
            .iter_mut()
            .find(|call| call.id == id)
            .ok_or_else(|| Error::NotFound {
                resource: format!("Call {id}"),
            })?;
        f(call);
        Ok(call.clone())
    }

    /// Copy of every record, used for snapshot computation
    #[must_use]
    pub fn all(&self) -> Vec<CallRecord> {
        self.calls.read().clone()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.read().len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.read().is_empty()
    }

    /// Export matching calls as CSV
    ///
    /// The status, intent and search filters apply; pagination does not.
    pub fn export_csv(&self, filter: &CallFilter) -> Result<String> {
        let calls = self.calls.read();
        let mut matching: Vec<&CallRecord> =
            calls.iter().filter(|call| filter.matches(call)).collect();
        matching.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "id",
                "session_id",
                "caller_name",
                "caller_phone",
                "caller_email",
                "start_time",
                "end_time",
                "duration_seconds",
                "status",
                "primary_intent",
                "appointment_booked",
                "lead_qualified",
                "follow_up_required",
                "summary",
            ])
            .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;

        for call in matching {
            writer
                .write_record([
                    call.id.to_string(),
                    call.session_id.clone(),
                    call.caller_name.clone().unwrap_or_default(),
                    call.caller_phone.clone().unwrap_or_default(),
                    call.caller_email.clone().unwrap_or_default(),
                    call.start_time.to_rfc3339(),
                    call.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
                    call.duration_seconds.map(|d| d.to_string()).unwrap_or_default(),
                    call.status.to_string(),
                    call.primary_intent.clone().unwrap_or_default(),
                    call.appointment_booked.to_string(),
                    call.lead_qualified.to_string(),
                    call.follow_up_required.to_string(),
                    call.conversation_summary.clone().unwrap_or_default(),
                ])
                .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Other(format!("CSV export failed: {e}")))?;
        String::from_utf8(bytes).map_err(|e| Error::Other(format!("CSV export failed: {e}")))
    }

    /// Populate the log with demo traffic
    pub fn seed_demo(&self) {
        let now = Utc::now();
        let rows = [
            (
                "sess_001",
                Some("John Smith"),
                Some("(555) 123-4567"),
                Some("john@email.com"),
                "appointment_booking",
                CallStatus::Completed,
                180,
                30,
                true,
                true,
                false,
                "Customer booked a consultation appointment for next Tuesday at 2 PM.",
            ),
            (
                "sess_002",
                Some("Sarah Johnson"),
                Some("(555) 987-6543"),
                Some("sarah@email.com"),
                "business_hours",
                CallStatus::Completed,
                45,
                45,
                false,
                false,
                false,
                "Customer inquired about business hours and location.",
            ),
            (
                "sess_003",
                Some("Mike Wilson"),
                Some("(555) 456-7890"),
                None,
                "services",
                CallStatus::Completed,
                120,
                75,
                false,
                true,
                false,
                "Customer asked about available services and pricing.",
            ),
            (
                "sess_004",
                Some("Emily Davis"),
                Some("(555) 321-0987"),
                Some("emily@email.com"),
                "appointment_cancel",
                CallStatus::Completed,
                90,
                90,
                false,
                false,
                false,
                "Customer cancelled their existing appointment.",
            ),
            (
                "sess_005",
                Some("Unknown Caller"),
                Some("(555) 111-2222"),
                None,
                "unknown",
                CallStatus::Failed,
                15,
                120,
                false,
                false,
                true,
                "Call ended abruptly, possible technical issue.",
            ),
        ];

        for (session, name, phone, email, intent, status, duration, minutes_ago, booked, lead, follow_up, summary) in
            rows
        {
            let start = now - Duration::minutes(minutes_ago);
            let record = CallRecord {
                caller_name: name.map(str::to_string),
                caller_phone: phone.map(str::to_string),
                caller_email: email.map(str::to_string),
                start_time: start,
                end_time: Some(start + Duration::seconds(duration)),
                duration_seconds: Some(duration),
                status,
                primary_intent: Some(intent.to_string()),
                conversation_summary: Some(summary.to_string()),
                appointment_booked: booked,
                lead_qualified: lead,
                follow_up_required: follow_up,
                ..CallRecord::new(session)
            };
            self.insert(record);
        }
        tracing::info!(count = self.len(), "call log seeded with demo data");
    }
}
