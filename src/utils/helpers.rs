//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the crate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new request id
pub fn generate_request_id() -> Uuid {
    Uuid::new_v4()
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Mask a bearer token so it can appear in logs
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if token.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}

/// Build a `key=value&...` query string with percent-encoded values
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Normalize a student number as typed or stored
pub fn normalize_student_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Check that a route path is absolute
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/')
}
