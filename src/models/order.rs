//! Study-pack ordering models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A study pack that groups orderable items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: i64,
    pub name: String,
    pub course_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderableItem {
    pub id: i64,
    pub bucket_id: i64,
    pub name: String,
    /// Price in the smallest currency unit
    pub price: i64,
    #[serde(default)]
    pub in_stock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Packed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub student_number: String,
    pub bucket_id: i64,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub student_number: String,
    pub bucket_id: i64,
    pub lines: Vec<OrderLine>,
}

/// Printable shipping label for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLabel {
    pub order_id: i64,
    pub student_number: String,
    pub recipient: String,
    pub address: Vec<String>,
    pub phone: String,
}

impl ShippingLabel {
    /// Label text, top to bottom
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.address.len() + 4);
        lines.push(self.recipient.clone());
        lines.extend(self.address.iter().cloned());
        lines.push(format!("Tel: {}", self.phone));
        lines.push(format!("Order #{} / {}", self.order_id, self.student_number));
        lines
    }
}
