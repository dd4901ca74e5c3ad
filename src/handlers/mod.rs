//! Page and form handlers
//!
//! The surface page components call into.

pub mod forms;
pub mod pages;

pub use forms::{submit_enrollment, submit_order, submit_profile, SubmissionOutcome};
pub use pages::{PageData, PageStatus};
