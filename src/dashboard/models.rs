//! Dashboard payload types. All of them round-trip through the cache as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A metric that can be trended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Revenue,
    Customers,
    Orders,
    Products,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Revenue,
        MetricKind::Customers,
        MetricKind::Orders,
        MetricKind::Products,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Revenue => "revenue",
            MetricKind::Customers => "customers",
            MetricKind::Orders => "orders",
            MetricKind::Products => "products",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        MetricKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| AppError::UnknownMetric(s.trim().to_string()))
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_revenue: f64,
    pub revenue_this_period: f64,
    pub total_customers: usize,
    pub new_customers_this_period: usize,
    pub total_orders: usize,
    pub total_products: usize,
    pub average_order_value: f64,
    pub inventory_value: f64,
    pub low_stock_products: usize,
    pub period_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Current window against the window before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub metric: MetricKind,
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
    pub direction: TrendDirection,
}

/// Ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    OutOfStock,
    LowStock,
    RevenueDecline,
    InactiveCustomers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub kind: AlertKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entity_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub metrics: KeyMetrics,
    pub trends: Vec<Trend>,
    pub alerts: Vec<Alert>,
    pub insights: Vec<Insight>,
    pub generated_at: DateTime<Utc>,
}
