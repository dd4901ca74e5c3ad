//! Authentication middleware
//!
//! Attaches the bearer credential of the current session to outgoing requests
//! and stamps each request with the session epoch it was issued under.

use std::sync::Arc;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use crate::services::api::ApiRequest;
use crate::state::SessionManager;
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_credential_attached;
use super::RequestStage;

/// Bearer-token injection stage
#[derive(Clone)]
pub struct BearerAuth {
    session: Arc<SessionManager>,
}

impl BearerAuth {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl RequestStage for BearerAuth {
    fn on_request(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        let (token, epoch) = self.session.credential();
        request.epoch = epoch;

        match token {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    PortalError::InvalidInput("credential is not a valid header value".to_string())
                })?;
                request.headers.insert(AUTHORIZATION, value);
                log_credential_attached(&token, &request.path);
            }
            None => {
                request.headers.remove(AUTHORIZATION);
            }
        }

        Ok(request)
    }
}
