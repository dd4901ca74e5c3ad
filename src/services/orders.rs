//! Study-pack ordering and shipping-label service

use tracing::{debug, info};
use crate::models::{Bucket, CreateOrderRequest, ExtendedProfile, Order, OrderableItem, ShippingLabel};
use crate::services::api::{ApiClient, RequestOptions};
use crate::services::envelope;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::normalize_student_number;

#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn buckets(&self) -> Result<Vec<Bucket>> {
        envelope::data(self.api.get("/buckets").await?)
    }

    pub async fn items(&self, bucket_id: i64) -> Result<Vec<OrderableItem>> {
        envelope::data(self.api.get(&format!("/buckets/{}/items", bucket_id)).await?)
    }

    pub async fn place(&self, request: &CreateOrderRequest) -> Result<Order> {
        if request.lines.is_empty() || request.lines.iter().any(|l| l.quantity == 0) {
            return Err(PortalError::InvalidInput("an order needs at least one line with a positive quantity".to_string()));
        }

        let order: Order = envelope::data(self.api.post("/orders", request).await?)?;
        info!(order_id = order.id, student_number = %order.student_number, "Order placed");
        Ok(order)
    }

    pub async fn orders(&self, student_number: &str) -> Result<Vec<Order>> {
        let student_number = normalize_student_number(student_number)
            .ok_or_else(|| PortalError::InvalidInput("student number is required".to_string()))?;
        let response = self
            .api
            .get_with("/orders", RequestOptions::query("student_number", &student_number))
            .await?;
        envelope::data(response)
    }

    pub async fn order(&self, order_id: i64) -> Result<Order> {
        envelope::data(self.api.get(&format!("/orders/{}", order_id)).await?)
    }
}

/// Compose the shipping label for `order` from the student's profile
pub fn shipping_label(order: &Order, profile: &ExtendedProfile) -> Result<ShippingLabel> {
    if order.student_number != profile.student_number {
        return Err(PortalError::InvalidInput(format!(
            "order {} belongs to {}, profile is {}",
            order.id, order.student_number, profile.student_number
        )));
    }

    let recipient = if profile.full_name.trim().is_empty() {
        format!("{} {}", profile.first_name, profile.last_name).trim().to_string()
    } else {
        profile.full_name.trim().to_string()
    };
    if recipient.is_empty() || profile.address_line1.trim().is_empty() {
        return Err(PortalError::InvalidInput(format!(
            "profile {} has no recipient name or address",
            profile.student_number
        )));
    }

    debug!(order_id = order.id, "Composed shipping label");
    Ok(ShippingLabel {
        order_id: order.id,
        student_number: order.student_number.clone(),
        recipient,
        address: profile.address_lines(),
        phone: profile.mobile.clone(),
    })
}
