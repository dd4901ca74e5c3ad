//! Backend envelope normalization
//!
//! The LMS backend answers most calls with HTTP 200 and reports the real
//! outcome in the body (`message`, `status`, `success`). Everything above this
//! module works with `Result` values only.

use serde::de::DeserializeOwned;
use serde_json::Value;
use crate::services::api::ApiResponse;
use crate::utils::errors::{ApiError, PortalError, Result};

/// Lookup body message meaning "no such profile"
pub const PROFILE_NOT_FOUND: &str = "User not found.";

/// Creation body message meaning "profile stored"
pub const RECORD_CREATED: &str = "Record created successfully.";

/// Enrollment body message meaning "enrolled"
pub const ENROLLED: &str = "Enrolled successfully.";

const GENERIC_REJECTION: &str = "The request was rejected by the server";

/// Succeeds only when the body message is exactly `sentinel`
pub fn expect_message(response: &ApiResponse, sentinel: &str) -> Result<()> {
    match response.message() {
        Some(message) if message == sentinel => Ok(()),
        Some(message) => Err(rejected(message)),
        None => Err(rejected(GENERIC_REJECTION)),
    }
}

/// `None` when the body message is `absent`, otherwise the decoded record
pub fn lookup<T: DeserializeOwned>(response: ApiResponse, absent: &str) -> Result<Option<T>> {
    if response.message() == Some(absent) {
        return Ok(None);
    }
    data(response).map(Some)
}

/// Decode the payload of a body that does not report a failure
pub fn data<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    if reports_failure(&response.body) {
        let message = response.message().unwrap_or(GENERIC_REJECTION).to_string();
        return Err(rejected(&message));
    }

    let payload = match response.body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        body => body,
    };

    serde_json::from_value(payload)
        .map_err(|e| PortalError::Api(ApiError::InvalidResponse(e.to_string())))
}

/// Whether a 2xx body carries a failure marker
pub fn reports_failure(body: &Value) -> bool {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return true;
    }

    match body.get("status") {
        Some(Value::Bool(ok)) => !ok,
        Some(Value::String(status)) => {
            matches!(status.to_ascii_lowercase().as_str(), "error" | "fail" | "failed")
        }
        Some(Value::Number(code)) => code.as_u64().map_or(false, |c| c >= 400),
        _ => false,
    }
}

fn rejected(message: &str) -> PortalError {
    PortalError::Api(ApiError::Rejected {
        message: message.to_string(),
    })
}
