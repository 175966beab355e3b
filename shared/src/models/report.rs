//! Sales Report Model (rapports de ventes)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Report period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Daily,
    Weekly,
}

impl ReportPeriod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
        }
    }

    /// Report title shown on the admin view
    pub const fn title(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "Journalier",
            ReportPeriod::Weekly => "Hebdomadaire",
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ReportPeriod::Daily),
            "weekly" => Ok(ReportPeriod::Weekly),
            other => Err(AppError::with_message(
                ErrorCode::ReportPeriodInvalid,
                format!("Unknown report period: {}", other),
            )
            .with_detail("period", other)),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive time range `[start, end]` selecting orders for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl ReportWindow {
    /// Both ends inclusive
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start_date <= *instant && *instant <= self.end_date
    }
}

/// Ranked dish entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularDish {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Aggregated sales statistics for one window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Display label -> quantity sold
    pub orders_by_category: BTreeMap<String, i64>,
    pub popular_dishes: Vec<PopularDish>,
}

/// Percentage rounded to one decimal; zero when the total is zero
fn percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (part / total * 1000.0).round() / 10.0
}

impl ReportData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Share of total revenue, in percent
    pub fn revenue_share(&self, revenue: f64) -> f64 {
        percent(revenue, self.total_revenue)
    }

    /// Total quantity across all categories
    pub fn category_total(&self) -> i64 {
        self.orders_by_category.values().sum()
    }

    /// Share of total quantity sold, in percent
    pub fn category_share(&self, quantity: i64) -> f64 {
        percent(quantity as f64, self.category_total() as f64)
    }

    /// Best-selling dish name
    pub fn top_dish(&self) -> Option<&str> {
        self.popular_dishes.first().map(|d| d.name.as_str())
    }
}

/// Popular dish with its share of revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishShare {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
    pub revenue_percent: f64,
}

/// Category with its share of quantity sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub quantity: i64,
    pub percent: f64,
}

/// Report as served to the admin view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub period: ReportPeriod,
    pub title: String,
    #[serde(flatten)]
    pub window: ReportWindow,
    pub generated_at: DateTime<Utc>,
    /// Revision of the order snapshot the report was computed from
    pub revision: u64,
    pub report: ReportData,
    pub top_dish: Option<String>,
    pub dish_shares: Vec<DishShare>,
    pub category_shares: Vec<CategoryShare>,
}

impl ReportView {
    pub fn new(
        period: ReportPeriod,
        window: ReportWindow,
        generated_at: DateTime<Utc>,
        revision: u64,
        report: ReportData,
    ) -> Self {
        let dish_shares = report
            .popular_dishes
            .iter()
            .map(|d| DishShare {
                name: d.name.clone(),
                quantity: d.quantity,
                revenue: d.revenue,
                revenue_percent: report.revenue_share(d.revenue),
            })
            .collect();
        let category_shares = report
            .orders_by_category
            .iter()
            .map(|(category, &quantity)| CategoryShare {
                category: category.clone(),
                quantity,
                percent: report.category_share(quantity),
            })
            .collect();

        Self {
            period,
            title: period.title().to_string(),
            window,
            generated_at,
            revision,
            top_dish: report.top_dish().map(str::to_string),
            dish_shares,
            category_shares,
            report,
        }
    }
}
