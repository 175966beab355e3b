//! Order Model
//!
//! [`Order`] is the normalized snapshot the report engine consumes.
//! [`OrderRow`] mirrors what the hosted backend returns for
//! `orders` joined with `order_items` and `dishes`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dish::Dish;

/// One dish line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub quantity: i32,
    /// Dish as it was when the order was placed
    pub dish: Dish,
}

/// Normalized order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub table_number: i32,
    /// Lifecycle tag owned by the backend (pending, served, ...)
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Informational; reports recompute revenue from items
    pub total: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Dish row as embedded by the backend join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
}

/// `order_items` row with its dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub quantity: i32,
    /// Unit price charged when the order was placed
    pub price_at_time: Option<f64>,
    pub dish: DishRow,
}

/// `orders` row with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub table_number: i32,
    pub status: String,
    /// RFC 3339 creation time
    pub created_at: Option<String>,
    pub total: f64,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}
