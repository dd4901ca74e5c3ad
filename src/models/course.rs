//! Course, class and enrollment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// A scheduled class (intake) of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseClass {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub year: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_number: String,
    pub course_id: i64,
    pub class_id: Option<i64>,
    pub enrolled_at: Option<DateTime<Utc>>,
}

/// Body of `POST /enrollments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_number: String,
    pub course_id: i64,
    pub class_id: Option<i64>,
}
