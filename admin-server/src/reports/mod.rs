//! Reports - 销售报表
//!
//! - [`aggregator`] - pure aggregation over an order snapshot
//! - [`money`] - decimal helpers for revenue
//! - [`service`] - refresher publishing daily and weekly reports

pub mod aggregator;
pub mod money;
pub mod service;

pub use aggregator::{POPULAR_DISH_LIMIT, aggregate, aggregate_window};
pub use service::{PeriodReport, ReportBoard, ReportService};
