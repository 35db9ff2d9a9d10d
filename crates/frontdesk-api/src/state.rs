//! Shared application state for the API server

use frontdesk_core::{Config, Result};
use frontdesk_dialogue::{SessionStore, SimulatedReceptionist};
use frontdesk_store::{AppointmentStore, CallStore, SettingsStore};
use std::sync::Arc;

/// State shared across all request handlers
///
/// Cloning is cheap; everything mutable sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,

    /// Live conversation sessions
    pub sessions: Arc<SessionStore>,

    /// The receptionist answering the chat endpoint
    pub receptionist: Arc<SimulatedReceptionist>,

    /// Call log backing the phone views
    pub calls: Arc<CallStore>,

    /// Appointment book
    pub appointments: Arc<AppointmentStore>,

    /// Editable business settings
    pub settings: Arc<SettingsStore>,
}

impl AppState {
    /// Build application state from configuration
    ///
    /// Seeds the demo call log and appointment book when
    /// `api.seed_demo_data` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let sessions = Arc::new(SessionStore::new(&config.session));
        let receptionist = Arc::new(SimulatedReceptionist::new(
            Arc::clone(&sessions),
            &config.receptionist,
            config.business.clone(),
        ));
        let calls = Arc::new(CallStore::new());
        let appointments = Arc::new(AppointmentStore::new());
        let settings = Arc::new(SettingsStore::from_business(&config.business));

        if config.api.seed_demo_data {
            calls.seed_demo();
            appointments.seed_demo();
        }

        Ok(Self {
            config,
            sessions,
            receptionist,
            calls,
            appointments,
            settings,
        })
    }

    /// Validate the application state before serving traffic
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()
    }
}
