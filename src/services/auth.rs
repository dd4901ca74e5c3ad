//! Authentication service implementation
//!
//! Login, logout and start-up restore. Login is the only place a session is
//! created; the session-expiry middleware is the only other writer.

use std::sync::Arc;
use tracing::{info, warn};
use crate::models::{LoginRequest, LoginResponse, SessionUser};
use crate::services::api::ApiClient;
use crate::services::envelope;
use crate::state::{Session, SessionManager};
use crate::utils::errors::{ApiError, PortalError, Result};

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Exchange credentials for a bearer token and start a session
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(PortalError::InvalidInput("email and password are required".to_string()));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let response = match self.api.post(LOGIN_PATH, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(email = %request.email, error = %e, "Login failed");
                return Err(e);
            }
        };

        let LoginResponse { token, user } = envelope::data(response)?;
        if token.is_empty() {
            return Err(PortalError::Api(ApiError::InvalidResponse(
                "login response carried an empty token".to_string(),
            )));
        }

        self.session.establish(token, user.clone()).await?;
        info!(user_id = %user.id, status = ?user.status, "Logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await
    }

    /// Pick up a session persisted by an earlier run
    pub async fn restore(&self) -> Result<Option<Session>> {
        self.session.restore().await
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.current_user().is_some()
    }
}
