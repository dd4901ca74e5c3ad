//! Extended-profile service
//!
//! Lookup and creation of the backend's extended student profile. Both calls
//! signal their outcome through body messages, normalized by `envelope`.

use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use crate::models::{CreateProfileRequest, ExtendedProfile, ProfileForm};
use crate::services::api::{ApiClient, RequestOptions};
use crate::services::envelope::{self, PROFILE_NOT_FOUND, RECORD_CREATED};
use crate::state::SessionManager;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::normalize_student_number;

pub const PROFILE_LOOKUP_PATH: &str = "/user-full-details/get/student/";
pub const PROFILE_CREATE_PATH: &str = "/user-full-details";

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
    session: Arc<SessionManager>,
}

impl ProfileService {
    pub fn new(api: ApiClient, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Whether an extended profile exists for `student_number`
    pub async fn exists(&self, student_number: &str) -> Result<bool> {
        let record: Option<Value> = self.lookup(student_number).await?;
        debug!(student_number = student_number, exists = record.is_some(), "Profile lookup finished");
        Ok(record.is_some())
    }

    /// Fetch the extended profile for `student_number`
    pub async fn fetch(&self, student_number: &str) -> Result<Option<ExtendedProfile>> {
        self.lookup(student_number).await
    }

    async fn lookup<T: DeserializeOwned>(&self, student_number: &str) -> Result<Option<T>> {
        let student_number = normalize_student_number(student_number)
            .ok_or_else(|| PortalError::InvalidInput("student number is required".to_string()))?;
        let response = self
            .api
            .get_with(PROFILE_LOOKUP_PATH, RequestOptions::query("student_number", &student_number))
            .await?;
        envelope::lookup(response, PROFILE_NOT_FOUND)
    }

    /// Submit the completion form for the signed-in student
    ///
    /// Contact fields and the student number come from the session user.
    pub async fn submit(&self, form: ProfileForm) -> Result<String> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| PortalError::NotAuthenticated("no active session".to_string()))?;
        let student_number = user
            .student_number()
            .ok_or_else(|| PortalError::InvalidInput("session user has no student number".to_string()))?
            .to_string();

        let request = CreateProfileRequest {
            form,
            student_number: student_number.clone(),
            email: user.email.clone(),
            mobile: user.phone.clone(),
        };

        let response = self.api.post(PROFILE_CREATE_PATH, &request).await?;
        envelope::expect_message(&response, RECORD_CREATED)?;

        info!(student_number = %student_number, "Extended profile created");
        Ok(student_number)
    }
}
