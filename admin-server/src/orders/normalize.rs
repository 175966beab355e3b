//! Backend row → [`Order`] normalization

use chrono::{DateTime, Utc};
use shared::models::{Dish, DishRow, Order, OrderItem, OrderItemRow, OrderRow};

use crate::utils::{AppError, AppResult};

/// Normalize a backend order row
///
/// `received_at` stands in for a missing `created_at`.
pub fn normalize_order(row: OrderRow, received_at: DateTime<Utc>) -> AppResult<Order> {
    let timestamp = match row.created_at.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::invalid_order_timestamp(&row.id, raw))?,
        None => {
            tracing::debug!(order_id = %row.id, "Order row has no created_at, using receive time");
            received_at
        }
    };

    Ok(Order {
        id: row.id,
        table_number: row.table_number,
        status: row.status,
        timestamp,
        total: row.total,
        items: row.order_items.into_iter().map(normalize_item).collect(),
    })
}

/// Price charged at order time wins over the dish's current price,
/// including a charged price of 0
fn normalize_item(row: OrderItemRow) -> OrderItem {
    let price = row.price_at_time.unwrap_or(row.dish.price);
    OrderItem {
        quantity: row.quantity,
        dish: dish_snapshot(row.dish, price),
    }
}

fn dish_snapshot(row: DishRow, price: f64) -> Dish {
    Dish {
        id: row.id,
        name: row.name,
        description: row.description.unwrap_or_default(),
        price,
        category: row.category,
        image_url: row.image_url.unwrap_or_default(),
    }
}
