//! Money calculation utilities using rust_decimal for precision
//!
//! Revenue is accumulated as `Decimal` and converted to `f64` only when the
//! report is emitted. No rounding happens here: sums stay raw so that the
//! revenue of two disjoint order sets adds up to the revenue of their union.
//! Currency formatting belongs to whoever displays the amounts.

use rust_decimal::prelude::*;
use shared::models::{Order, OrderItem};

use crate::utils::{AppError, AppResult};

/// Largest unit price accepted in a dish snapshot
const MAX_PRICE: f64 = 1_000_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 (unrounded)
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// `quantity × unit price`
#[inline]
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Reject items that would make totals meaningless
pub fn validate_item(order: &Order, item: &OrderItem) -> AppResult<()> {
    if item.quantity <= 0 {
        return Err(AppError::invalid_order_item(
            &order.id,
            format!(
                "quantity must be positive, got {} for dish '{}'",
                item.quantity, item.dish.name
            ),
        ));
    }
    let price = item.dish.price;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::invalid_order_item(
            &order.id,
            format!(
                "price must be a non-negative number, got {} for dish '{}'",
                price, item.dish.name
            ),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::invalid_order_item(
            &order.id,
            format!(
                "price exceeds maximum allowed ({}), got {} for dish '{}'",
                MAX_PRICE, price, item.dish.name
            ),
        ));
    }
    Ok(())
}
