//! LMS Portal client core
//!
//! The session and data-access core of an LMS administrative frontend: an
//! authenticated API client built from composable middleware stages, the
//! session it authenticates with, and the once-per-session profile gate that
//! routes students with an incomplete profile to profile completion.

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PortalError, ApiError, Result};

// Re-export main components for easy access
pub use services::{ApiClient, ServiceFactory, ProfileGate};
pub use state::{AppContext, SessionManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
