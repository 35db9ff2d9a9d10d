//! Editable business settings, seeded from configuration

use std::collections::BTreeMap;

use frontdesk_core::config::BusinessConfig;
use frontdesk_core::error::{Error, Result};
use parking_lot::RwLock;

/// Keys seeded from the business section of the configuration
pub const SEED_KEYS: [&str; 7] = [
    "business_name",
    "business_hours",
    "business_address",
    "business_phone",
    "business_email",
    "services",
    "appointment_duration",
];

/// Key-value store of business settings
///
/// Starts from the business section of the configuration; dashboard edits
/// live here for the lifetime of the process. Keys outside the seeded set
/// are accepted, the console stores arbitrary configuration rows.
#[derive(Debug)]
pub struct SettingsStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl SettingsStore {
    /// Seed the store from business configuration
    #[must_use]
    pub fn from_business(business: &BusinessConfig) -> Self {
        let mut values = BTreeMap::new();
        values.insert("business_name".to_string(), business.name.clone());
        values.insert("business_hours".to_string(), business.hours.clone());
        values.insert("business_address".to_string(), business.address.clone());
        values.insert("business_phone".to_string(), business.phone.clone());
        values.insert("business_email".to_string(), business.email.clone());
        values.insert("services".to_string(), business.services.join(", "));
        values.insert(
            "appointment_duration".to_string(),
            business.appointment_duration_minutes.to_string(),
        );
        Self {
            values: RwLock::new(values),
        }
    }

    /// All settings in key order
    #[must_use]
    pub fn all(&self) -> BTreeMap<String, String> {
        self.values.read().clone()
    }

    /// One setting by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Set a single setting, returning the previous value if any
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank key.
    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<Option<String>> {
        if key.trim().is_empty() {
            return Err(Error::Validation {
                field: "key".to_string(),
                message: "setting keys must not be blank".to_string(),
            });
        }
        Ok(self.values.write().insert(key.to_string(), value.into()))
    }

    /// Apply a batch of updates, returning the full map afterwards
    ///
    /// Unknown keys are stored as new rows. Blank keys reject the whole
    /// batch before any change lands.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any key in the batch is blank.
    pub fn update(&self, changes: &BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
        for key in changes.keys() {
            if key.trim().is_empty() {
                return Err(Error::Validation {
                    field: "key".to_string(),
                    message: "setting keys must not be blank".to_string(),
                });
            }
        }

        let mut values = self.values.write();
        for (key, value) in changes {
            values.insert(key.clone(), value.clone());
        }
        tracing::info!(changed = changes.len(), "settings updated");
        Ok(values.clone())
    }

    /// Number of stored settings
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}
