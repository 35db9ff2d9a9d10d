//! Appointment book with guarded status transitions

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use frontdesk_core::error::{Error, Result};
use frontdesk_core::types::{Appointment, AppointmentStatus};
use parking_lot::RwLock;
use uuid::Uuid;

/// Fields required to create an appointment
#[derive(Debug, Clone)]
pub struct NewAppointment {
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
    /// Free-form notes
    pub notes: Option<String>,
}

/// Filters applied when listing the appointment book
#[derive(Debug, Clone)]
pub struct AppointmentFilter {
    /// Keep appointments in this status
    pub status: Option<AppointmentStatus>,
    /// Keep appointments on this calendar date
    pub date: Option<NaiveDate>,
    /// Case-insensitive match against name, phone, email or service
    pub search: Option<String>,
    /// Page size
    pub limit: usize,
    /// Rows to skip before the page
    pub offset: usize,
}

impl Default for AppointmentFilter {
    fn default() -> Self {
        Self {
            status: None,
            date: None,
            search: None,
            limit: 50,
            offset: 0,
        }
    }
}

impl AppointmentFilter {
    fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(status) = self.status {
            if appointment.status != status {
                return false;
            }
        }
        if let Some(date) = self.date {
            if appointment.scheduled_date != date {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = appointment.customer_name.to_lowercase().contains(&term)
                || appointment
                    .customer_phone
                    .as_deref()
                    .is_some_and(|v| v.contains(&term))
                || appointment
                    .customer_email
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&term))
                || appointment.service_type.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// In-memory appointment book, schedule order on reads
#[derive(Debug, Default)]
pub struct AppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl AppointmentStore {
    /// Create an empty appointment book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Book an appointment, returning the stored record
    pub fn insert(&self, new: NewAppointment) -> Appointment {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            customer_email: new.customer_email,
            service_type: new.service_type,
            scheduled_date: new.scheduled_date,
            scheduled_time: new.scheduled_time,
            duration_minutes: new.duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: new.notes,
            created_at: Utc::now(),
        };
        self.appointments.write().push(appointment.clone());
        tracing::debug!(
            appointment_id = %appointment.id,
            customer = %appointment.customer_name,
            "appointment created"
        );
        appointment
    }

    /// Page of matching appointments plus the total matching count
    #[must_use]
    pub fn list(&self, filter: &AppointmentFilter) -> (Vec<Appointment>, usize) {
        let appointments = self.appointments.read();
        let mut matching: Vec<Appointment> = appointments
            .iter()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        drop(appointments);

        matching.sort_by_key(|a| (a.scheduled_date, a.scheduled_time));
        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();
        (page, total)
    }

    /// Look up an appointment by id
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<Appointment> {
        self.appointments
            .read()
            .iter()
            .find(|appointment| appointment.id == id)
            .cloned()
    }

    /// Move an appointment to a new status, enforcing the transition rules
    pub fn update_status(&self, id: Uuid, next: AppointmentStatus) -> Result<Appointment> {
        let mut appointments = self.appointments.write();
        let appointment = appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or_else(|| Error::NotFound {
                resource: format!("Appointment {id}"),
            })?;

        if !appointment.status.can_transition_to(next) {
            return Err(Error::Conflict {
                message: format!(
                    "Cannot change appointment from {} to {}",
                    appointment.status, next
                ),
            });
        }

        appointment.status = next;
        tracing::info!(appointment_id = %id, status = %next, "appointment status changed");
        Ok(appointment.clone())
    }

    /// Appointments on a given day, cancelled excluded, time order
    #[must_use]
    pub fn today(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self
            .appointments
            .read()
            .iter()
            .filter(|a| a.scheduled_date == date && a.status != AppointmentStatus::Cancelled)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_time);
        rows
    }

    /// Scheduled or confirmed appointments after a given day
    #[must_use]
    pub fn upcoming(&self, after: NaiveDate) -> Vec<Appointment> {
        let mut rows: Vec<Appointment> = self
            .appointments
            .read()
            .iter()
            .filter(|a| {
                a.scheduled_date > after
                    && matches!(
                        a.status,
                        AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
                    )
            })
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.scheduled_date, a.scheduled_time));
        rows
    }

    /// Copy of every record, used for snapshot computation
    #[must_use]
    pub fn all(&self) -> Vec<Appointment> {
        self.appointments.read().clone()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.appointments.read().len()
    }

    /// Whether the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.appointments.read().is_empty()
    }

    /// Populate the book with demo appointments around today
    pub fn seed_demo(&self) {
        let today = Utc::now().date_naive();
        let rows = [
            (
                "John Smith",
                "(555) 123-4567",
                "john@email.com",
                "Consultation",
                4,
                (14, 0),
                60,
                AppointmentStatus::Scheduled,
                "First-time customer, interested in our premium package.",
            ),
            (
                "Sarah Johnson",
                "(555) 987-6543",
                "sarah@email.com",
                "Follow-up",
                5,
                (10, 30),
                30,
                AppointmentStatus::Confirmed,
                "Follow-up appointment for previous consultation.",
            ),
            (
                "Mike Wilson",
                "(555) 456-7890",
                "mike@email.com",
                "Treatment",
                6,
                (15, 30),
                90,
                AppointmentStatus::Scheduled,
                "Requires extended session. Wheelchair accessible.",
            ),
            (
                "Emily Davis",
                "(555) 321-0987",
                "emily@email.com",
                "Consultation",
                1,
                (11, 0),
                60,
                AppointmentStatus::Cancelled,
                "Customer cancelled due to scheduling conflict.",
            ),
            (
                "Robert Brown",
                "(555) 555-1234",
                "robert@email.com",
                "Treatment",
                0,
                (16, 0),
                60,
                AppointmentStatus::Completed,
                "Successful treatment session.",
            ),
        ];

        let mut appointments = self.appointments.write();
        for (name, phone, email, service, day_offset, (hour, minute), duration, status, notes) in rows {
            let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                continue;
            };
            appointments.push(Appointment {
                id: Uuid::new_v4(),
                customer_name: name.to_string(),
                customer_phone: Some(phone.to_string()),
                customer_email: Some(email.to_string()),
                service_type: service.to_string(),
                scheduled_date: today + Duration::days(day_offset),
                scheduled_time: time,
                duration_minutes: duration,
                status,
                notes: Some(notes.to_string()),
                created_at: Utc::now(),
            });
        }
        tracing::info!(count = appointments.len(), "appointment book seeded with demo data");
    }
}
