//! Dashboard Module
//!
//! Key metrics, trends, alerts and insights computed from a user's business
//! data and served through the cache.

pub mod analytics;
mod models;
mod service;

pub use analytics::AnalyticsConfig;
pub use models::{
    Alert, AlertKind, AlertSeverity, DashboardData, Insight, KeyMetrics, MetricKind, Trend,
    TrendDirection,
};
pub use service::DashboardService;
