//! Course catalog and enrollment service

use tracing::info;
use crate::models::{Course, CourseClass, CreateEnrollmentRequest, Enrollment};
use crate::services::api::{ApiClient, RequestOptions};
use crate::services::envelope::{self, ENROLLED};
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::normalize_student_number;

#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
}

impl CatalogService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        envelope::data(self.api.get("/courses").await?)
    }

    pub async fn classes(&self, course_id: i64) -> Result<Vec<CourseClass>> {
        envelope::data(self.api.get(&format!("/courses/{}/classes", course_id)).await?)
    }

    pub async fn enrollments(&self, student_number: &str) -> Result<Vec<Enrollment>> {
        let student_number = normalize_student_number(student_number)
            .ok_or_else(|| PortalError::InvalidInput("student number is required".to_string()))?;
        let response = self
            .api
            .get_with("/enrollments", RequestOptions::query("student_number", &student_number))
            .await?;
        envelope::data(response)
    }

    pub async fn enroll(&self, request: &CreateEnrollmentRequest) -> Result<()> {
        let response = self.api.post("/enrollments", request).await?;
        envelope::expect_message(&response, ENROLLED)?;
        info!(
            student_number = %request.student_number,
            course_id = request.course_id,
            "Student enrolled"
        );
        Ok(())
    }
}
