//! Form submissions
//!
//! A form either closes (success) or stays open showing the backend's reason.

use tracing::info;
use crate::models::{CreateEnrollmentRequest, CreateOrderRequest, ProfileForm};
use crate::services::{Notification, Notifier};
use crate::state::AppContext;
use crate::utils::errors::PortalError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Closed,
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Closed)
    }
}

fn failed(ctx: &AppContext, err: PortalError) -> SubmissionOutcome {
    let reason = err.rejection().map(str::to_string).unwrap_or_else(|| err.to_string());
    ctx.notifications.notify(Notification::error(reason.clone()));
    SubmissionOutcome::Failed { reason }
}

/// Profile-completion form
pub async fn submit_profile(ctx: &AppContext, form: ProfileForm) -> SubmissionOutcome {
    match ctx.services.profile_service.submit(form).await {
        Ok(student_number) => {
            ctx.profile_gate.mark_complete(&student_number);
            ctx.notifications.notify(Notification::success("Profile saved"));
            info!(student_number = %student_number, "Profile completion closed");
            SubmissionOutcome::Closed
        }
        Err(e) => failed(ctx, e),
    }
}

pub async fn submit_enrollment(ctx: &AppContext, request: CreateEnrollmentRequest) -> SubmissionOutcome {
    match ctx.services.catalog_service.enroll(&request).await {
        Ok(()) => {
            ctx.notifications.notify(Notification::success("Enrollment saved"));
            SubmissionOutcome::Closed
        }
        Err(e) => failed(ctx, e),
    }
}

pub async fn submit_order(ctx: &AppContext, request: CreateOrderRequest) -> SubmissionOutcome {
    match ctx.services.order_service.place(&request).await {
        Ok(order) => {
            ctx.notifications.notify(Notification::success(format!("Order #{} placed", order.id)));
            SubmissionOutcome::Closed
        }
        Err(e) => failed(ctx, e),
    }
}
