//! Extended student profile model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Backend-owned extended profile, keyed by student number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProfile {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub name_with_initials: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub mobile: String,
    pub whatsapp: Option<String>,
    pub home_phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
}

/// Fields the student fills in on the completion form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub name_with_initials: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub whatsapp: Option<String>,
    pub home_phone: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
}

/// Body of `POST /user-full-details`
///
/// Contact fields come from the stored session user, not the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    #[serde(flatten)]
    pub form: ProfileForm,
    pub student_number: String,
    pub email: String,
    pub mobile: Option<String>,
}

impl ExtendedProfile {
    /// Address block, one line per non-empty component
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = vec![self.address_line1.clone()];
        if let Some(line2) = self.address_line2.as_ref().filter(|l| !l.trim().is_empty()) {
            lines.push(line2.clone());
        }
        match self.postal_code.as_ref().filter(|c| !c.trim().is_empty()) {
            Some(code) => lines.push(format!("{} {}", self.city, code)),
            None => lines.push(self.city.clone()),
        }
        if let Some(district) = self.district.as_ref().filter(|d| !d.trim().is_empty()) {
            lines.push(district.clone());
        }
        lines.retain(|l| !l.trim().is_empty());
        lines
    }
}
