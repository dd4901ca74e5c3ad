//! Services module
//!
//! This module contains the API client and the backend-facing services

pub mod api;
pub mod auth;
pub mod catalog;
pub mod envelope;
pub mod navigation;
pub mod notification;
pub mod orders;
pub mod profile;
pub mod profile_gate;

// Re-export commonly used services
pub use api::{ApiClient, ApiRequest, ApiResponse, HttpTransport, RequestOptions, Transport};
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use navigation::{NavigationHistory, Navigator};
pub use notification::{Notification, NotificationCenter, NotificationLevel, NotificationStats, Notifier};
pub use orders::OrderService;
pub use profile::ProfileService;
pub use profile_gate::{GateOutcome, GateState, ProfileGate, ProfileStatus};

use std::sync::Arc;
use crate::state::SessionManager;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub catalog_service: CatalogService,
    pub order_service: OrderService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory sharing one API client
    pub fn new(api: ApiClient, session: Arc<SessionManager>) -> Self {
        Self {
            auth_service: AuthService::new(api.clone(), session.clone()),
            profile_service: ProfileService::new(api.clone(), session),
            catalog_service: CatalogService::new(api.clone()),
            order_service: OrderService::new(api),
        }
    }
}
