//! Configuration management for the Frontdesk console

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulated receptionist configuration
    #[serde(default)]
    pub receptionist: ReceptionistConfig,

    /// Conversation session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Business profile used in canned replies and settings
    #[serde(default)]
    pub business: BusinessConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Default page size for list endpoints
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Maximum page size for list endpoints
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,

    /// Seed demo calls and appointments on startup
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Simulated receptionist configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceptionistConfig {
    /// Lower bound of the simulated reply delay in milliseconds
    #[serde(default = "default_min_reply_delay_ms")]
    pub min_reply_delay_ms: u64,

    /// Upper bound of the simulated reply delay in milliseconds
    #[serde(default = "default_max_reply_delay_ms")]
    pub max_reply_delay_ms: u64,

    /// Fail every reply (exercises the apology path)
    #[serde(default = "default_simulate_failures")]
    pub simulate_failures: bool,
}

/// Conversation session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions older than this are dropped by cleanup
    #[serde(default = "default_session_max_age_hours")]
    pub max_age_hours: u64,

    /// How often the cleanup task runs, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Sessions idle longer than this count as stale in health reports
    #[serde(default = "default_idle_warning")]
    pub idle_warning_seconds: u64,

    /// Turns kept per session before the oldest are discarded
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

/// Business profile configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Display name of the business
    #[serde(default = "default_business_name")]
    pub name: String,

    /// Opening hours, human readable
    #[serde(default = "default_business_hours")]
    pub hours: String,

    /// Street address
    #[serde(default = "default_business_address")]
    pub address: String,

    /// Phone number
    #[serde(default = "default_business_phone")]
    pub phone: String,

    /// Email address
    #[serde(default = "default_business_email")]
    pub email: String,

    /// Bookable services
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    /// Default appointment length in minutes
    #[serde(default = "default_appointment_duration")]
    pub appointment_duration_minutes: u32,

    /// Cap on recorded call duration in seconds
    #[serde(default = "default_max_call_duration")]
    pub max_call_duration_seconds: u32,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_enable_cors() -> bool {
    true
}

const fn default_page_size() -> i64 {
    50
}

const fn default_max_page_size() -> i64 {
    1000
}

const fn default_seed_demo_data() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

const fn default_min_reply_delay_ms() -> u64 {
    1000
}

const fn default_max_reply_delay_ms() -> u64 {
    2000
}

const fn default_simulate_failures() -> bool {
    false
}

const fn default_session_max_age_hours() -> u64 {
    24
}

const fn default_cleanup_interval() -> u64 {
    3600
}

const fn default_idle_warning() -> u64 {
    1800
}

const fn default_max_history_turns() -> usize {
    100
}

fn default_business_name() -> String {
    "Your Business Name".to_string()
}

fn default_business_hours() -> String {
    "Monday-Friday 9AM-6PM, Saturday 9AM-3PM".to_string()
}

fn default_business_address() -> String {
    "123 Main Street, City, State 12345".to_string()
}

fn default_business_phone() -> String {
    "(555) 123-4567".to_string()
}

fn default_business_email() -> String {
    "info@yourbusiness.com".to_string()
}

fn default_services() -> Vec<String> {
    vec![
        "Consultation".to_string(),
        "Treatment".to_string(),
        "Follow-up".to_string(),
    ]
}

const fn default_appointment_duration() -> u32 {
    60
}

const fn default_max_call_duration() -> u32 {
    600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: default_enable_cors(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for ReceptionistConfig {
    fn default() -> Self {
        Self {
            min_reply_delay_ms: default_min_reply_delay_ms(),
            max_reply_delay_ms: default_max_reply_delay_ms(),
            simulate_failures: default_simulate_failures(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_hours: default_session_max_age_hours(),
            cleanup_interval_seconds: default_cleanup_interval(),
            idle_warning_seconds: default_idle_warning(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            hours: default_business_hours(),
            address: default_business_address(),
            phone: default_business_phone(),
            email: default_business_email(),
            services: default_services(),
            appointment_duration_minutes: default_appointment_duration(),
            max_call_duration_seconds: default_max_call_duration(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
            receptionist: ReceptionistConfig::default(),
            session: SessionConfig::default(),
            business: BusinessConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and files
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("FRONTDESK").separator("_"))
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }

    /// Check cross-field constraints that serde defaults cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or inconsistent.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::Configuration {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.receptionist.min_reply_delay_ms > self.receptionist.max_reply_delay_ms {
            return Err(crate::Error::Configuration {
                message: format!(
                    "receptionist.min_reply_delay_ms ({}) exceeds max_reply_delay_ms ({})",
                    self.receptionist.min_reply_delay_ms, self.receptionist.max_reply_delay_ms
                ),
            });
        }

        if self.api.default_page_size <= 0 || self.api.max_page_size < self.api.default_page_size {
            return Err(crate::Error::Configuration {
                message: "api page sizes must be positive and max >= default".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(crate::Error::Configuration {
                message: format!("unknown logging.level: {}", self.logging.level),
            });
        }

        if self.business.services.is_empty() {
            return Err(crate::Error::Configuration {
                message: "business.services must not be empty".to_string(),
            });
        }

        if self.business.appointment_duration_minutes == 0 {
            return Err(crate::Error::Configuration {
                message: "business.appointment_duration_minutes must be non-zero".to_string(),
            });
        }

        if self.business.max_call_duration_seconds == 0 {
            return Err(crate::Error::Configuration {
                message: "business.max_call_duration_seconds must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::field_reassign_with_default,
    clippy::uninlined_format_args
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_seconds, 30);

        assert!(config.api.enable_cors);
        assert_eq!(config.api.default_page_size, 50);
        assert_eq!(config.api.max_page_size, 1000);
        assert!(config.api.seed_demo_data);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.file.is_none());

        assert_eq!(config.receptionist.min_reply_delay_ms, 1000);
        assert_eq!(config.receptionist.max_reply_delay_ms, 2000);
        assert!(!config.receptionist.simulate_failures);

        assert_eq!(config.session.max_age_hours, 24);
        assert_eq!(config.session.cleanup_interval_seconds, 3600);
        assert_eq!(config.session.idle_warning_seconds, 1800);
        assert_eq!(config.session.max_history_turns, 100);

        assert_eq!(config.business.name, "Your Business Name");
        assert_eq!(config.business.hours, "Monday-Friday 9AM-6PM, Saturday 9AM-3PM");
        assert_eq!(config.business.address, "123 Main Street, City, State 12345");
        assert_eq!(config.business.phone, "(555) 123-4567");
        assert_eq!(config.business.email, "info@yourbusiness.com");
        assert_eq!(
            config.business.services,
            vec!["Consultation", "Treatment", "Follow-up"]
        );
        assert_eq!(config.business.appointment_duration_minutes, 60);
        assert_eq!(config.business.max_call_duration_seconds, 600);
    }

    #[test]
    fn test_default_value_functions() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_request_timeout(), 30);
        assert!(default_enable_cors());
        assert_eq!(default_page_size(), 50);
        assert_eq!(default_max_page_size(), 1000);
        assert!(default_seed_demo_data());
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
        assert_eq!(default_min_reply_delay_ms(), 1000);
        assert_eq!(default_max_reply_delay_ms(), 2000);
        assert!(!default_simulate_failures());
        assert_eq!(default_session_max_age_hours(), 24);
        assert_eq!(default_cleanup_interval(), 3600);
        assert_eq!(default_idle_warning(), 1800);
        assert_eq!(default_max_history_turns(), 100);
        assert_eq!(default_business_name(), "Your Business Name");
        assert_eq!(default_services(), vec!["Consultation", "Treatment", "Follow-up"]);
        assert_eq!(default_appointment_duration(), 60);
        assert_eq!(default_max_call_duration(), 600);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.server.host, config.server.host);
        assert_eq!(deserialized.server.port, config.server.port);
        assert_eq!(
            deserialized.receptionist.min_reply_delay_ms,
            config.receptionist.min_reply_delay_ms
        );
        assert_eq!(deserialized.session.max_age_hours, config.session.max_age_hours);
        assert_eq!(deserialized.business.services, config.business.services);
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "server": {"host": "localhost"},
            "receptionist": {"min_reply_delay_ms": 0, "max_reply_delay_ms": 0},
            "business": {"name": "Sunrise Dental"}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080); // Uses default
        assert_eq!(config.receptionist.min_reply_delay_ms, 0);
        assert_eq!(config.receptionist.max_reply_delay_ms, 0);
        assert!(!config.receptionist.simulate_failures); // Uses default
        assert_eq!(config.business.name, "Sunrise Dental");
        assert_eq!(config.business.phone, "(555) 123-4567"); // Uses default
    }

    #[test]
    fn test_empty_config_deserialization() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.default_page_size, 50);
        assert_eq!(config.business.services.len(), 3);
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_delay_bounds() {
        let mut config = Config::default();
        config.receptionist.min_reply_delay_ms = 3000;
        config.receptionist.max_reply_delay_ms = 2000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_reply_delay_ms"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_services() {
        let mut config = Config::default();
        config.business.services.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_call_duration_cap() {
        let mut config = Config::default();
        config.business.max_call_duration_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_page_sizes() {
        let mut config = Config::default();
        config.api.max_page_size = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_delay_bounds_are_valid() {
        let mut config = Config::default();
        config.receptionist.min_reply_delay_ms = 0;
        config.receptionist.max_reply_delay_ms = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_complex_config_scenario() {
        let config = Config {
            server: ServerConfig {
                host: "192.168.1.100".to_string(),
                port: 9090,
                request_timeout_seconds: 60,
            },
            api: ApiConfig {
                enable_cors: false,
                default_page_size: 25,
                max_page_size: 200,
                seed_demo_data: false,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "text".to_string(),
                file: Some(PathBuf::from("/var/log/frontdesk/app.log")),
            },
            receptionist: ReceptionistConfig {
                min_reply_delay_ms: 250,
                max_reply_delay_ms: 750,
                simulate_failures: false,
            },
            session: SessionConfig {
                max_age_hours: 2,
                cleanup_interval_seconds: 300,
                idle_warning_seconds: 600,
                max_history_turns: 20,
            },
            business: BusinessConfig {
                name: "Sunrise Dental".to_string(),
                hours: "Mon-Fri 8AM-5PM".to_string(),
                address: "9 Elm Ave".to_string(),
                phone: "(555) 000-1111".to_string(),
                email: "front@sunrise.example".to_string(),
                services: vec!["Cleaning".to_string(), "Checkup".to_string()],
                appointment_duration_minutes: 45,
                max_call_duration_seconds: 480,
            },
        };

        assert!(config.validate().is_ok());

        let serialized = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.server.port, 9090);
        assert_eq!(deserialized.api.default_page_size, 25);
        assert_eq!(deserialized.logging.file, Some(PathBuf::from("/var/log/frontdesk/app.log")));
        assert_eq!(deserialized.receptionist.max_reply_delay_ms, 750);
        assert_eq!(deserialized.session.max_history_turns, 20);
        assert_eq!(deserialized.business.services.len(), 2);
    }
}
