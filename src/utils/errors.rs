//! Error handling for the LMS portal client
//!
//! This module defines the main error types used throughout the crate
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the portal client
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised by the backend API or the transport in front of it
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("request timed out")]
    Timeout,

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// 2xx response whose body reports a failure
    #[error("{message}")]
    Rejected { message: String },
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Unreachable(e.to_string())
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::RequestFailed(e.to_string())
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(e: reqwest::Error) -> Self {
        PortalError::Api(e.into())
    }
}

impl PortalError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Api(ApiError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the failure happened below the HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PortalError::Api(ApiError::Timeout)
                | PortalError::Api(ApiError::Unreachable(_))
                | PortalError::Api(ApiError::RequestFailed(_))
        )
    }

    /// Application-level rejection message, if this is one
    pub fn rejection(&self) -> Option<&str> {
        match self {
            PortalError::Api(ApiError::Rejected { message }) => Some(message),
            _ => None,
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PortalError::Config(_) => false,
            PortalError::Api(ApiError::Status { status, .. }) => *status >= 500 || *status == 429,
            PortalError::Api(ApiError::Timeout) => true,
            PortalError::Api(ApiError::Unreachable(_)) => true,
            PortalError::Api(ApiError::RequestFailed(_)) => true,
            PortalError::Api(ApiError::InvalidResponse(_)) => false,
            PortalError::Api(ApiError::Rejected { .. }) => false,
            PortalError::Storage(_) => true,
            PortalError::Redis(_) => true,
            PortalError::Serialization(_) => false,
            PortalError::Io(_) => true,
            PortalError::UrlParse(_) => false,
            PortalError::NotAuthenticated(_) => false,
            PortalError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PortalError::Config(_) => ErrorSeverity::Critical,
            PortalError::NotAuthenticated(_) => ErrorSeverity::Warning,
            PortalError::Api(ApiError::Status { status: 401, .. }) => ErrorSeverity::Warning,
            PortalError::Api(ApiError::Rejected { .. }) => ErrorSeverity::Warning,
            PortalError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
