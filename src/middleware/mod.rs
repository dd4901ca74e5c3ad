//! Middleware module
//!
//! Request and response stages composed into the pipeline the API client runs
//! every call through. Stages run in registration order.

pub mod auth;
pub mod logging;
pub mod session_expiry;

use std::sync::Arc;
use async_trait::async_trait;
use crate::services::api::{ApiRequest, ApiResponse};
use crate::utils::errors::Result;

// Re-export commonly used middleware
pub use auth::BearerAuth;
pub use logging::RequestLogging;
pub use session_expiry::SessionExpiry;

/// `(request) -> request` stage
pub trait RequestStage: Send + Sync {
    fn on_request(&self, request: ApiRequest) -> Result<ApiRequest>;
}

/// `(response | error) -> response | error` stage
#[async_trait]
pub trait ResponseStage: Send + Sync {
    async fn on_response(&self, request: &ApiRequest, outcome: Result<ApiResponse>) -> Result<ApiResponse>;
}

/// Ordered list of request and response stages
#[derive(Clone, Default)]
pub struct Pipeline {
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    pub fn with_response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    /// Run the request stages
    pub fn prepare(&self, request: ApiRequest) -> Result<ApiRequest> {
        self.request_stages
            .iter()
            .try_fold(request, |request, stage| stage.on_request(request))
    }

    /// Run the response stages over the transport outcome
    pub async fn complete(&self, request: &ApiRequest, outcome: Result<ApiResponse>) -> Result<ApiResponse> {
        let mut outcome = outcome;
        for stage in &self.response_stages {
            outcome = stage.on_response(request, outcome).await;
        }
        outcome
    }
}
