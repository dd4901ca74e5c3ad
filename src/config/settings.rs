//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub routes: RoutesConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Which store keeps the durable session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Redis,
}

/// Session storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: Option<String>,
    pub prefix: String,
    pub ttl_seconds: u64,
    pub token_key: String,
    pub user_key: String,
    pub profile_check_key: String,
}

/// Navigation destinations used by the session core
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    pub login_path: String,
    pub profile_completion_path: String,
}

/// Execution environment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuntimeConfig {
    /// Storage, navigation and notifications are only touched when interactive
    pub interactive: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub profile_gate: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load("config")
    }

    /// Defaults, then the optional file `name`, then `LMS_PORTAL_*` variables
    pub fn load(name: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("LMS_PORTAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Parse a complete settings document
    pub fn from_toml_str(raw: &str) -> Result<Self, crate::utils::errors::PortalError> {
        toml::from_str(raw)
            .map_err(|e| crate::utils::errors::PortalError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Render settings as TOML, e.g. to seed a config file
    pub fn to_toml_string(&self) -> Result<String, crate::utils::errors::PortalError> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::utils::errors::PortalError::Config(format!("Cannot render TOML: {}", e)))
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PortalError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_seconds: 15,
                user_agent: "lms-portal/0.1".to_string(),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                redis_url: None,
                prefix: "lms-portal:".to_string(),
                ttl_seconds: 60 * 60 * 24 * 7,
                token_key: "token".to_string(),
                user_key: "user".to_string(),
                profile_check_key: "profileChecked".to_string(),
            },
            routes: RoutesConfig {
                login_path: "/login".to_string(),
                profile_completion_path: "/complete-profile".to_string(),
            },
            runtime: RuntimeConfig { interactive: true },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                json: false,
            },
            features: FeaturesConfig { profile_gate: true },
        }
    }
}
