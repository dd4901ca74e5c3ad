//! Logging middleware
//!
//! Stamps every request with an `X-Request-Id` header and records method,
//! path, status and latency once the outcome is known.

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use tracing::debug;
use crate::services::api::{ApiRequest, ApiResponse};
use crate::utils::errors::{PortalError, Result};
use crate::utils::logging::log_api_call;
use super::{RequestStage, ResponseStage};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-id and call logging stage
#[derive(Clone, Default)]
pub struct RequestLogging;

impl RequestLogging {
    pub fn new() -> Self {
        Self
    }
}

impl RequestStage for RequestLogging {
    fn on_request(&self, mut request: ApiRequest) -> Result<ApiRequest> {
        let value = HeaderValue::from_str(&request.id.to_string())
            .map_err(|e| PortalError::InvalidInput(format!("request id: {}", e)))?;
        request
            .headers
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        debug!(request_id = %request.id, method = %request.method, path = %request.path, "Request prepared");
        Ok(request)
    }
}

#[async_trait]
impl ResponseStage for RequestLogging {
    async fn on_response(&self, request: &ApiRequest, outcome: Result<ApiResponse>) -> Result<ApiResponse> {
        let status = match &outcome {
            Ok(response) => Some(response.status),
            Err(err) => err.status(),
        };
        let duration_ms = request.elapsed().as_millis() as u64;
        log_api_call(request.method.as_str(), &request.path, status, duration_ms);
        outcome
    }
}
