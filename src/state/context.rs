//! Application context
//!
//! Owns the session, the API client and the services built on top of it, and
//! hands them to page loaders.

use std::sync::Arc;
use crate::config::Settings;
use crate::middleware::session_expiry::InteractiveHooks;
use crate::middleware::{BearerAuth, Pipeline, RequestLogging, SessionExpiry};
use crate::services::{
    ApiClient, HttpTransport, NavigationHistory, Navigator, NotificationCenter, Notifier, ProfileGate,
    ServiceFactory, Transport,
};
use crate::state::session::SessionManager;
use crate::state::storage::{open_durable_store, KeyValueStore, MemoryStore, SessionStore};
use crate::utils::errors::Result;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub session: Arc<SessionManager>,
    pub notifications: Arc<NotificationCenter>,
    pub navigation: Arc<NavigationHistory>,
    pub api: ApiClient,
    pub services: ServiceFactory,
    pub profile_gate: Arc<ProfileGate>,
}

impl AppContext {
    /// Build from settings: durable store per configuration, HTTP transport
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let durable = open_durable_store(&settings.storage).await?;
        let transport = Arc::new(HttpTransport::new(&settings.api)?);
        Ok(Self::build(settings, durable, transport))
    }

    /// Wire the context from explicit parts
    pub fn build(settings: Settings, durable: Arc<dyn KeyValueStore>, transport: Arc<dyn Transport>) -> Self {
        let store = SessionStore::new(durable, Arc::new(MemoryStore::new()), &settings.storage);
        let session = Arc::new(SessionManager::new(store));
        let notifications = Arc::new(NotificationCenter::default());
        let navigation = Arc::new(NavigationHistory::new());

        let logging = Arc::new(RequestLogging::new());
        let expiry = if settings.runtime.interactive {
            SessionExpiry::interactive(
                session.clone(),
                InteractiveHooks {
                    notifier: notifications.clone() as Arc<dyn Notifier>,
                    navigator: navigation.clone() as Arc<dyn Navigator>,
                    login_path: settings.routes.login_path.clone(),
                },
            )
        } else {
            SessionExpiry::headless(session.clone())
        };

        let pipeline = Pipeline::new()
            .with_request_stage(logging.clone())
            .with_request_stage(Arc::new(BearerAuth::new(session.clone())))
            .with_response_stage(Arc::new(expiry))
            .with_response_stage(logging);

        let api = ApiClient::new(transport, pipeline);
        let services = ServiceFactory::new(api.clone(), session.clone());

        let gate_navigator = if settings.runtime.interactive {
            Some(navigation.clone() as Arc<dyn Navigator>)
        } else {
            None
        };
        let profile_gate = Arc::new(ProfileGate::new(
            session.clone(),
            services.profile_service.clone(),
            gate_navigator,
            settings.routes.profile_completion_path.clone(),
            settings.features.profile_gate,
        ));

        Self {
            settings,
            session,
            notifications,
            navigation,
            api,
            services,
            profile_gate,
        }
    }
}
