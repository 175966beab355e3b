//! Sales report aggregation
//!
//! Reduces an order snapshot to [`ReportData`] for one report window.
//! Pure and synchronous: the caller owns the snapshot and the clock.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use shared::models::{Order, PopularDish, ReportData, ReportPeriod, ReportWindow, category_label};

use super::money;
use crate::utils::AppResult;
use crate::utils::time::report_window;

/// Number of entries kept in the popular dish ranking
pub const POPULAR_DISH_LIMIT: usize = 5;

/// Running totals for one dish name
struct DishTally<'a> {
    name: &'a str,
    quantity: i64,
    revenue: Decimal,
}

/// Aggregate `orders` over the `period` window around `now`
///
/// The calendar (day and week boundaries) is the one of `now`'s timezone.
pub fn aggregate<Z: TimeZone>(
    orders: &[Order],
    period: ReportPeriod,
    now: &DateTime<Z>,
) -> AppResult<ReportData> {
    let window = report_window(period, now);
    let report = aggregate_window(orders, &window)?;

    tracing::debug!(
        period = %period,
        start = %window.start_date,
        end = %window.end_date,
        orders = report.total_orders,
        revenue = report.total_revenue,
        "Report aggregated"
    );

    Ok(report)
}

/// Aggregate the orders whose timestamp falls in `window` (inclusive)
///
/// Dish statistics are keyed by dish name. Items of orders outside the
/// window are not inspected.
pub fn aggregate_window(orders: &[Order], window: &ReportWindow) -> AppResult<ReportData> {
    let mut total_orders: u64 = 0;
    let mut total_revenue = Decimal::ZERO;
    let mut dishes: Vec<DishTally<'_>> = Vec::new();
    let mut dish_slots: HashMap<&str, usize> = HashMap::new();
    let mut orders_by_category: BTreeMap<String, i64> = BTreeMap::new();

    for order in orders.iter().filter(|o| window.contains(&o.timestamp)) {
        total_orders += 1;

        for item in &order.items {
            money::validate_item(order, item)?;

            let quantity = i64::from(item.quantity);
            let revenue = money::line_total(item.dish.price, item.quantity);

            let slot = *dish_slots.entry(item.dish.name.as_str()).or_insert_with(|| {
                dishes.push(DishTally {
                    name: item.dish.name.as_str(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
                dishes.len() - 1
            });
            let tally = &mut dishes[slot];
            tally.quantity += quantity;
            tally.revenue += revenue;

            total_revenue += revenue;

            let label = category_label(&item.dish.category);
            *orders_by_category.entry(label.to_string()).or_insert(0) += quantity;
        }
    }

    // Stable sort: equal quantities keep first-seen order
    dishes.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    let popular_dishes = dishes
        .into_iter()
        .take(POPULAR_DISH_LIMIT)
        .map(|d| PopularDish {
            name: d.name.to_string(),
            quantity: d.quantity,
            revenue: money::to_f64(d.revenue),
        })
        .collect();

    Ok(ReportData {
        total_orders,
        total_revenue: money::to_f64(total_revenue),
        orders_by_category,
        popular_dishes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{Dish, OrderItem};
    use shared::ErrorCode;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn item(name: &str, price: f64, category: &str, quantity: i32) -> OrderItem {
        OrderItem {
            quantity,
            dish: Dish {
                id: format!("dish-{}", name.to_lowercase()),
                name: name.to_string(),
                description: String::new(),
                price,
                category: category.to_string(),
                image_url: String::new(),
            },
        }
    }

    fn order(id: &str, timestamp: &str, items: Vec<OrderItem>) -> Order {
        Order {
            id: id.to_string(),
            table_number: 1,
            status: "served".to_string(),
            timestamp: at(timestamp),
            total: 0.0,
            items,
        }
    }

    fn now() -> DateTime<Utc> {
        at("2024-03-15T10:00:00Z")
    }

    #[test]
    fn test_daily_window_boundaries() {
        let steak = || vec![item("Steak", 25.0, "Main Course", 1)];
        let orders = vec![
            order("start", "2024-03-15T00:00:00.000Z", steak()),
            order("end", "2024-03-15T23:59:59.999Z", steak()),
            order("before", "2024-03-14T23:59:59.999Z", steak()),
            order("after", "2024-03-16T00:00:00.000Z", steak()),
        ];

        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, 50.0);
    }

    #[test]
    fn test_weekly_includes_whole_week() {
        let orders = vec![
            order("mon", "2024-03-11T00:00:00Z", vec![item("Steak", 25.0, "Main Course", 1)]),
            order("sun", "2024-03-17T23:59:59.999Z", vec![item("Steak", 25.0, "Main Course", 1)]),
            order("prev-sun", "2024-03-10T23:59:59.999Z", vec![item("Steak", 25.0, "Main Course", 1)]),
        ];
        let report = aggregate(&orders, ReportPeriod::Weekly, &now()).unwrap();
        assert_eq!(report.total_orders, 2);
    }

    #[test]
    fn test_empty_input() {
        for period in [ReportPeriod::Daily, ReportPeriod::Weekly] {
            let report = aggregate(&[], period, &now()).unwrap();
            assert_eq!(report, ReportData::empty());
            assert_eq!(report.total_orders, 0);
            assert_eq!(report.total_revenue, 0.0);
            assert!(report.orders_by_category.is_empty());
            assert!(report.popular_dishes.is_empty());
        }
    }

    #[test]
    fn test_steak_scenario() {
        let orders = vec![
            order("o1", "2024-03-15T12:00:00Z", vec![item("Steak", 25.0, "Main Course", 2)]),
            order("o2", "2024-03-15T13:00:00Z", vec![item("Steak", 25.0, "Main Course", 1)]),
        ];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();

        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, 75.0);
        assert_eq!(
            report.orders_by_category,
            BTreeMap::from([("Plat Principal".to_string(), 3)])
        );
        assert_eq!(
            report.popular_dishes,
            vec![PopularDish {
                name: "Steak".to_string(),
                quantity: 3,
                revenue: 75.0,
            }]
        );
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let orders = vec![order(
            "o1",
            "2024-03-15T12:00:00Z",
            vec![
                item("Chef's plate", 40.0, "Special", 2),
                item("Bissap", 5.0, "Beverage", 1),
            ],
        )];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        assert_eq!(report.orders_by_category.get("Special"), Some(&2));
        assert_eq!(report.orders_by_category.get("Boisson"), Some(&1));
        assert_eq!(report.orders_by_category.len(), 2);
    }

    #[test]
    fn test_top_five_truncation_and_order() {
        let quantities = [10, 9, 8, 7, 6, 5, 4];
        let mut items: Vec<OrderItem> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| item(&format!("Dish{}", i), 1.0, "Starter", q))
            .collect();
        // Reverse the input so ranking does not just mirror insertion order
        items.reverse();
        let orders = vec![order("o1", "2024-03-15T12:00:00Z", items)];

        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        let ranked: Vec<i64> = report.popular_dishes.iter().map(|d| d.quantity).collect();
        assert_eq!(ranked, vec![10, 9, 8, 7, 6]);
        assert_eq!(report.popular_dishes[0].name, "Dish0");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let orders = vec![
            order("o1", "2024-03-15T09:00:00Z", vec![item("Yassa", 30.0, "Main Course", 2)]),
            order(
                "o2",
                "2024-03-15T09:30:00Z",
                vec![item("Mafé", 28.0, "Main Course", 2), item("Thiakry", 6.0, "Dessert", 3)],
            ),
        ];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        let names: Vec<&str> = report.popular_dishes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Thiakry", "Yassa", "Mafé"]);
    }

    #[test]
    fn test_revenue_is_additive() {
        let a = vec![
            order("a1", "2024-03-15T08:00:00Z", vec![item("Café", 0.1, "Beverage", 3)]),
            order("a2", "2024-03-15T09:00:00Z", vec![item("Steak", 25.5, "Main Course", 1)]),
        ];
        let b = vec![order(
            "b1",
            "2024-03-15T11:00:00Z",
            vec![item("Café", 0.2, "Beverage", 1), item("Tarte", 7.35, "Dessert", 2)],
        )];
        let all: Vec<Order> = a.iter().chain(b.iter()).cloned().collect();

        let ra = aggregate(&a, ReportPeriod::Daily, &now()).unwrap();
        let rb = aggregate(&b, ReportPeriod::Daily, &now()).unwrap();
        let rall = aggregate(&all, ReportPeriod::Daily, &now()).unwrap();

        assert_eq!(ra.total_revenue, 25.8);
        assert_eq!(rb.total_revenue, 14.9);
        assert_eq!(ra.total_revenue + rb.total_revenue, rall.total_revenue);
    }

    #[test]
    fn test_sub_cent_revenue_is_additive() {
        let a = vec![order("a1", "2024-03-15T08:00:00Z", vec![item("Bonbon", 0.005, "Dessert", 1)])];
        let b = vec![order("b1", "2024-03-15T09:00:00Z", vec![item("Bonbon", 0.005, "Dessert", 1)])];
        let all: Vec<Order> = a.iter().chain(b.iter()).cloned().collect();

        let ra = aggregate(&a, ReportPeriod::Daily, &now()).unwrap();
        let rb = aggregate(&b, ReportPeriod::Daily, &now()).unwrap();
        let rall = aggregate(&all, ReportPeriod::Daily, &now()).unwrap();

        assert_eq!(ra.total_revenue, 0.005);
        assert_eq!(ra.total_revenue + rb.total_revenue, rall.total_revenue);
        assert_eq!(rall.popular_dishes[0].revenue, 0.01);
    }

    #[test]
    fn test_same_name_dishes_are_merged() {
        let mut special = item("Steak", 30.0, "Special", 1);
        special.dish.id = "dish-other-steak".to_string();
        let orders = vec![order(
            "o1",
            "2024-03-15T12:00:00Z",
            vec![item("Steak", 25.0, "Main Course", 2), special],
        )];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        assert_eq!(report.popular_dishes.len(), 1);
        assert_eq!(report.popular_dishes[0].quantity, 3);
        assert_eq!(report.popular_dishes[0].revenue, 80.0);
    }

    #[test]
    fn test_zero_priced_items_and_empty_orders() {
        let orders = vec![
            order("o1", "2024-03-15T12:00:00Z", vec![item("Eau", 0.0, "Beverage", 4)]),
            order("o2", "2024-03-15T12:05:00Z", vec![]),
        ];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.popular_dishes[0].quantity, 4);
        assert_eq!(report.revenue_share(report.popular_dishes[0].revenue), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let orders = vec![order(
            "bad",
            "2024-03-15T12:00:00Z",
            vec![item("Steak", 25.0, "Main Course", 0)],
        )];
        let err = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderItem);
        assert!(err.message.contains("quantity must be positive"));
    }

    #[test]
    fn test_rejects_invalid_price() {
        for price in [-1.0, f64::NAN, f64::INFINITY] {
            let orders = vec![order(
                "bad",
                "2024-03-15T12:00:00Z",
                vec![item("Steak", price, "Main Course", 1)],
            )];
            let err = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidOrderItem);
        }
    }

    #[test]
    fn test_malformed_order_outside_window_is_ignored() {
        let orders = vec![
            order("old", "2024-03-01T12:00:00Z", vec![item("Steak", 25.0, "Main Course", -1)]),
            order("ok", "2024-03-15T12:00:00Z", vec![item("Steak", 25.0, "Main Course", 1)]),
        ];
        let report = aggregate(&orders, ReportPeriod::Daily, &now()).unwrap();
        assert_eq!(report.total_orders, 1);
    }
}
