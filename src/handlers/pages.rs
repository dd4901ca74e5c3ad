//! Page loaders
//!
//! What a protected page does on mount: run the profile gate next to its own
//! content fetch and turn failures into an empty, notified state.

use std::future::Future;
use futures::future::join_all;
use tracing::warn;
use crate::models::{Bucket, Course, CourseClass, Enrollment, Order, OrderableItem, ShippingLabel};
use crate::services::orders::shipping_label;
use crate::services::{GateOutcome, Notification, Notifier};
use crate::state::AppContext;
use crate::utils::errors::{PortalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ready,
    /// Content failed to load; an empty list and a notification were produced
    Degraded,
    /// The user is being sent elsewhere (login or profile completion)
    Redirected,
}

#[derive(Debug, Clone)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub status: PageStatus,
    pub gate: GateOutcome,
}

impl<T> PageData<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn failure_reason(err: &PortalError) -> String {
    err.rejection().map(str::to_string).unwrap_or_else(|| err.to_string())
}

async fn load_protected<T, F>(ctx: &AppContext, what: &str, fetch: F) -> PageData<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    let (gate, result) = tokio::join!(ctx.profile_gate.on_protected_mount(), fetch);

    match result {
        Ok(items) => PageData {
            items,
            status: if gate.redirected() { PageStatus::Redirected } else { PageStatus::Ready },
            gate,
        },
        Err(e) if e.is_unauthorized() => PageData {
            items: Vec::new(),
            status: PageStatus::Redirected,
            gate,
        },
        Err(e) => {
            warn!(page = what, severity = %e.severity(), error = %e, "Page content failed to load");
            ctx.notifications
                .notify(Notification::error(format!("Could not load {}: {}", what, failure_reason(&e))));
            PageData {
                items: Vec::new(),
                status: if gate.redirected() { PageStatus::Redirected } else { PageStatus::Degraded },
                gate,
            }
        }
    }
}

pub async fn courses_page(ctx: &AppContext) -> PageData<Course> {
    load_protected(ctx, "courses", ctx.services.catalog_service.courses()).await
}

pub async fn classes_page(ctx: &AppContext, course_id: i64) -> PageData<CourseClass> {
    load_protected(ctx, "classes", ctx.services.catalog_service.classes(course_id)).await
}

pub async fn enrollments_page(ctx: &AppContext, student_number: &str) -> PageData<Enrollment> {
    load_protected(ctx, "enrollments", ctx.services.catalog_service.enrollments(student_number)).await
}

pub async fn buckets_page(ctx: &AppContext) -> PageData<Bucket> {
    load_protected(ctx, "study packs", ctx.services.order_service.buckets()).await
}

pub async fn bucket_items_page(ctx: &AppContext, bucket_id: i64) -> PageData<OrderableItem> {
    load_protected(ctx, "items", ctx.services.order_service.items(bucket_id)).await
}

pub async fn orders_page(ctx: &AppContext, student_number: &str) -> PageData<Order> {
    load_protected(ctx, "orders", ctx.services.order_service.orders(student_number)).await
}

/// Labels for the given orders; orders whose label cannot be built are skipped
pub async fn shipping_labels_page(ctx: &AppContext, order_ids: &[i64]) -> PageData<ShippingLabel> {
    let fetch = async {
        let labels = join_all(order_ids.iter().map(|&id| label_for(ctx, id))).await;
        let mut built = Vec::with_capacity(labels.len());
        for label in labels {
            match label {
                Ok(label) => built.push(label),
                Err(e) if e.is_unauthorized() || e.is_transport() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Skipping shipping label");
                    ctx.notifications.notify(Notification::warning(failure_reason(&e)));
                }
            }
        }
        Ok(built)
    };
    load_protected(ctx, "shipping labels", fetch).await
}

async fn label_for(ctx: &AppContext, order_id: i64) -> Result<ShippingLabel> {
    let order = ctx.services.order_service.order(order_id).await?;
    let profile = ctx
        .services
        .profile_service
        .fetch(&order.student_number)
        .await?
        .ok_or_else(|| {
            PortalError::InvalidInput(format!("student {} has no profile to ship to", order.student_number))
        })?;
    shipping_label(&order, &profile)
}
