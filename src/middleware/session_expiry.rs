//! Session-expiry middleware
//!
//! Central 401 recovery: wipe the session, tell the user, send them to login.
//! The failing call still fails; this stage never retries or swallows it.

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, warn};
use crate::services::api::{ApiRequest, ApiResponse};
use crate::services::navigation::Navigator;
use crate::services::notification::{Notification, Notifier, SESSION_EXPIRED_MESSAGE};
use crate::state::SessionManager;
use crate::utils::errors::Result;
use super::ResponseStage;

/// UI side effects available in an interactive runtime
#[derive(Clone)]
pub struct InteractiveHooks {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub login_path: String,
}

/// 401 recovery stage
#[derive(Clone)]
pub struct SessionExpiry {
    session: Arc<SessionManager>,
    hooks: Option<InteractiveHooks>,
}

impl SessionExpiry {
    /// Recovery with storage, notification and navigation side effects
    pub fn interactive(session: Arc<SessionManager>, hooks: InteractiveHooks) -> Self {
        Self {
            session,
            hooks: Some(hooks),
        }
    }

    /// Pass-through variant for runtimes without storage or navigation
    pub fn headless(session: Arc<SessionManager>) -> Self {
        Self { session, hooks: None }
    }
}

#[async_trait]
impl ResponseStage for SessionExpiry {
    async fn on_response(&self, request: &ApiRequest, outcome: Result<ApiResponse>) -> Result<ApiResponse> {
        let err = match outcome {
            Err(err) if err.is_unauthorized() => err,
            other => return other,
        };

        let Some(hooks) = &self.hooks else {
            debug!(path = %request.path, "401 in headless runtime, leaving session untouched");
            return Err(err);
        };

        if self.session.expire(request.epoch).await {
            warn!(path = %request.path, epoch = request.epoch, "Credential rejected, session expired");
            hooks.notifier.notify(Notification::warning(SESSION_EXPIRED_MESSAGE));
            hooks.navigator.navigate(&hooks.login_path);
        } else {
            debug!(path = %request.path, epoch = request.epoch, "401 for an already-expired session");
        }

        Err(err)
    }
}
