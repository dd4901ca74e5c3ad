//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::is_absolute_path;
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_storage_config(&settings.storage)?;
    validate_routes_config(&settings.routes)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate backend API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(PortalError::Config(
            "API base URL is required".to_string()
        ));
    }

    let parsed = url::Url::parse(&config.base_url)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PortalError::Config(
            format!("API base URL must be http or https, got {}", parsed.scheme())
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(PortalError::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate session storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.backend == StorageBackend::Redis
        && config.redis_url.as_deref().map_or(true, str::is_empty)
    {
        return Err(PortalError::Config(
            "Redis URL is required for the redis storage backend".to_string()
        ));
    }

    let keys = [&config.token_key, &config.user_key, &config.profile_check_key];
    if keys.iter().any(|k| k.is_empty()) {
        return Err(PortalError::Config(
            "Storage keys must not be empty".to_string()
        ));
    }

    if config.token_key == config.user_key
        || config.token_key == config.profile_check_key
        || config.user_key == config.profile_check_key
    {
        return Err(PortalError::Config(
            "Storage keys must be distinct".to_string()
        ));
    }

    Ok(())
}

/// Validate navigation routes
fn validate_routes_config(config: &super::RoutesConfig) -> Result<()> {
    for (name, path) in [
        ("login_path", &config.login_path),
        ("profile_completion_path", &config.profile_completion_path),
    ] {
        if !is_absolute_path(path) {
            return Err(PortalError::Config(
                format!("Route {} must start with '/': {}", name, path)
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PortalError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PortalError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
