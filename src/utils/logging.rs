//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the portal client.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::mask_token;

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "lms-portal.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PortalError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a session lifecycle transition
pub fn log_session_event(event: &str, user_id: Option<&str>, epoch: u64) {
    info!(
        event = event,
        user_id = user_id,
        epoch = epoch,
        "Session event"
    );
}

/// Log an outgoing credential without leaking it
pub fn log_credential_attached(token: &str, path: &str) {
    debug!(token = %mask_token(token), path = path, "Attached bearer credential");
}

/// Log a completed API call
pub fn log_api_call(method: &str, path: &str, status: Option<u16>, duration_ms: u64) {
    match status {
        Some(status) if status < 400 => debug!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call completed"
        ),
        Some(status) => warn!(
            method = method,
            path = path,
            status = status,
            duration_ms = duration_ms,
            "API call returned error status"
        ),
        None => error!(
            method = method,
            path = path,
            duration_ms = duration_ms,
            "API call failed before a response arrived"
        ),
    }
}

/// Log the outcome of a profile-gate check
pub fn log_gate_decision(student_number: &str, decision: &str) {
    info!(
        student_number = student_number,
        decision = decision,
        "Profile gate resolved"
    );
}
