//! In-memory stores backing the dashboard
//!
//! Call log, appointment book and business settings, plus the dashboard
//! snapshot computed over them. Everything lives in process memory; demo
//! seeds make a fresh instance look lived-in.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::significant_drop_tightening
)]

pub mod appointments;
pub mod calls;
pub mod settings;
pub mod stats;

pub use appointments::{AppointmentFilter, AppointmentStore, NewAppointment};
pub use calls::{CallFilter, CallStore};
pub use settings::SettingsStore;
pub use stats::{DailyActivity, DashboardSnapshot};
