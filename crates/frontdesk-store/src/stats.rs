//! Dashboard snapshot computed over the stores

use chrono::{DateTime, Duration, NaiveDate, Utc};
use frontdesk_core::types::{CallRecord, CallStatus};
use frontdesk_core::utils::format_call_duration;
use serde::Serialize;

use crate::appointments::AppointmentStore;
use crate::calls::CallStore;

/// Call and booking counts for one day
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyActivity {
    /// Day covered
    pub date: NaiveDate,
    /// Calls started that day
    pub calls: usize,
    /// Calls that booked an appointment that day
    pub appointments: usize,
}

/// Aggregated numbers for the dashboard landing page
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Calls ever logged
    pub total_calls: usize,
    /// Calls started today
    pub calls_today: usize,
    /// Calls currently in progress
    pub active_calls: usize,
    /// Calls that ended with a booking
    pub appointments_booked: usize,
    /// Calls flagged as qualified leads
    pub leads_generated: usize,
    /// Appointments on today's calendar, cancelled excluded
    pub appointments_today: usize,
    /// Open appointments after today
    pub upcoming_appointments: usize,
    /// Mean call length in seconds over ended calls
    pub average_call_duration_seconds: i64,
    /// Mean call length as minutes:seconds
    pub average_call_duration: String,
    /// Last seven days of traffic, oldest first
    pub daily: Vec<DailyActivity>,
    /// Five most recent calls, newest first
    pub recent_calls: Vec<CallRecord>,
    /// When the snapshot was computed
    pub generated_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Compute a snapshot of both stores as of `now`
    #[must_use]
    pub fn compute(calls: &CallStore, appointments: &AppointmentStore, now: DateTime<Utc>) -> Self {
        let records = calls.all();
        let today = now.date_naive();

        let mut recent_calls = records.clone();
        recent_calls.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent_calls.truncate(5);

        let durations: Vec<i64> = records.iter().filter_map(|c| c.duration_seconds).collect();
        let average_call_duration_seconds = i64::try_from(durations.len())
            .ok()
            .filter(|n| *n > 0)
            .map_or(0, |n| durations.iter().sum::<i64>() / n);

        let daily = (0i64..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                DailyActivity {
                    date,
                    calls: records
                        .iter()
                        .filter(|c| c.start_time.date_naive() == date)
                        .count(),
                    appointments: records
                        .iter()
                        .filter(|c| c.appointment_booked && c.start_time.date_naive() == date)
                        .count(),
                }
            })
            .collect();

        Self {
            total_calls: records.len(),
            calls_today: records
                .iter()
                .filter(|c| c.start_time.date_naive() == today)
                .count(),
            active_calls: records
                .iter()
                .filter(|c| c.status == CallStatus::Active)
                .count(),
            appointments_booked: records.iter().filter(|c| c.appointment_booked).count(),
            leads_generated: records.iter().filter(|c| c.lead_qualified).count(),
            appointments_today: appointments.today(today).len(),
            upcoming_appointments: appointments.upcoming(today).len(),
            average_call_duration_seconds,
            average_call_duration: format_call_duration(average_call_duration_seconds),
            daily,
            recent_calls,
            generated_at: now,
        }
    }
}
