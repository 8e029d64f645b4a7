//! Dashboard Analytics
//!
//! Pure computations over a business snapshot at a reference instant. Windows
//! are half-open on the left: the current window is `(now - w, now]`, the
//! previous one `(now - 2w, now - w]`.

use chrono::{DateTime, Duration, Utc};

use crate::dashboard::models::{
    Alert, AlertKind, AlertSeverity, DashboardData, Insight, KeyMetrics, MetricKind, Trend,
    TrendDirection,
};
use crate::repository::BusinessSnapshot;

/// Changes smaller than this (in percent) are reported as flat.
pub const FLAT_THRESHOLD_PERCENT: f64 = 1.0;

/// Revenue drops at or beyond this (in percent) raise an alert.
pub const REVENUE_DECLINE_ALERT_PERCENT: f64 = -20.0;

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    /// Length of one trend window
    pub window: Duration,
    /// Stock level at or below which a product is low, unless it sets its own
    pub low_stock_threshold: u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window: Duration::days(30),
            low_stock_threshold: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// `at - by`, saturating at the earliest representable instant.
fn earlier(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_sub_signed(by).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Window {
    fn current(now: DateTime<Utc>, len: Duration) -> Self {
        Self {
            start: earlier(now, len),
            end: now,
        }
    }

    fn previous(now: DateTime<Utc>, len: Duration) -> Self {
        let end = earlier(now, len);
        Self {
            start: earlier(end, len),
            end,
        }
    }

    fn contains(&self, at: DateTime<Utc>) -> bool {
        at > self.start && at <= self.end
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// Growth from zero counts as 100 %; zero to zero is no change.
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        round2((current - previous) / previous.abs() * 100.0)
    }
}

pub fn direction(change_percent: f64) -> TrendDirection {
    if change_percent >= FLAT_THRESHOLD_PERCENT {
        TrendDirection::Up
    } else if change_percent <= -FLAT_THRESHOLD_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}

fn metric_in_window(kind: MetricKind, snapshot: &BusinessSnapshot, window: Window) -> f64 {
    match kind {
        MetricKind::Revenue => snapshot
            .orders
            .iter()
            .filter(|o| window.contains(o.created_at))
            .map(|o| o.amount)
            .sum(),
        MetricKind::Orders => snapshot
            .orders
            .iter()
            .filter(|o| window.contains(o.created_at))
            .count() as f64,
        MetricKind::Customers => snapshot
            .customers
            .iter()
            .filter(|c| window.contains(c.created_at))
            .count() as f64,
        MetricKind::Products => snapshot
            .products
            .iter()
            .filter(|p| window.contains(p.created_at))
            .count() as f64,
    }
}

fn low_stock_limit(product_threshold: Option<u32>, config: &AnalyticsConfig) -> u32 {
    product_threshold.unwrap_or(config.low_stock_threshold)
}

// == Key Metrics ==
pub fn key_metrics(snapshot: &BusinessSnapshot, now: DateTime<Utc>, config: &AnalyticsConfig) -> KeyMetrics {
    let current = Window::current(now, config.window);
    let total_revenue: f64 = snapshot.orders.iter().map(|o| o.amount).sum();
    let total_orders = snapshot.orders.len();

    let average_order_value = if total_orders == 0 {
        0.0
    } else {
        round2(total_revenue / total_orders as f64)
    };

    KeyMetrics {
        total_revenue: round2(total_revenue),
        revenue_this_period: round2(metric_in_window(MetricKind::Revenue, snapshot, current)),
        total_customers: snapshot.customers.len(),
        new_customers_this_period: metric_in_window(MetricKind::Customers, snapshot, current) as usize,
        total_orders,
        total_products: snapshot.products.len(),
        average_order_value,
        inventory_value: round2(
            snapshot
                .products
                .iter()
                .map(|p| p.price * f64::from(p.stock_quantity))
                .sum(),
        ),
        low_stock_products: snapshot
            .products
            .iter()
            .filter(|p| p.stock_quantity <= low_stock_limit(p.low_stock_threshold, config))
            .count(),
        period_days: config.window.num_days(),
    }
}

// == Trends ==
pub fn trend(kind: MetricKind, snapshot: &BusinessSnapshot, now: DateTime<Utc>, config: &AnalyticsConfig) -> Trend {
    let current = round2(metric_in_window(kind, snapshot, Window::current(now, config.window)));
    let previous = round2(metric_in_window(kind, snapshot, Window::previous(now, config.window)));
    let change = change_percent(current, previous);

    Trend {
        metric: kind,
        current,
        previous,
        change_percent: change,
        direction: direction(change),
    }
}

pub fn trends(kinds: &[MetricKind], snapshot: &BusinessSnapshot, now: DateTime<Utc>, config: &AnalyticsConfig) -> Vec<Trend> {
    kinds.iter().map(|&kind| trend(kind, snapshot, now, config)).collect()
}

// == Alerts ==
/// Alerts ordered by severity, then message.
pub fn alerts(snapshot: &BusinessSnapshot, now: DateTime<Utc>, config: &AnalyticsConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for product in &snapshot.products {
        let limit = low_stock_limit(product.low_stock_threshold, config);
        if product.stock_quantity == 0 {
            alerts.push(Alert {
                severity: AlertSeverity::Critical,
                kind: AlertKind::OutOfStock,
                message: format!("'{}' is out of stock", product.name),
                entity_id: Some(product.id),
            });
        } else if product.stock_quantity <= limit {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                kind: AlertKind::LowStock,
                message: format!("'{}' is running low ({} left)", product.name, product.stock_quantity),
                entity_id: Some(product.id),
            });
        }
    }

    let revenue = trend(MetricKind::Revenue, snapshot, now, config);
    if revenue.previous > 0.0 && revenue.change_percent <= REVENUE_DECLINE_ALERT_PERCENT {
        alerts.push(Alert {
            severity: AlertSeverity::Warning,
            kind: AlertKind::RevenueDecline,
            message: format!(
                "Revenue is down {:.1}% compared to the previous {} days",
                revenue.change_percent.abs(),
                config.window.num_days()
            ),
            entity_id: None,
        });
    }

    let inactive_since = Window::previous(now, config.window).start;
    let inactive = snapshot
        .customers
        .iter()
        .filter(|c| c.last_purchase_at.is_some_and(|at| at <= inactive_since))
        .count();
    if inactive > 0 {
        alerts.push(Alert {
            severity: AlertSeverity::Info,
            kind: AlertKind::InactiveCustomers,
            message: format!(
                "{} customer(s) have not purchased in over {} days",
                inactive,
                config.window.num_days().saturating_mul(2)
            ),
            entity_id: None,
        });
    }

    alerts.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.message.cmp(&b.message)));
    alerts
}

// == Insights ==
pub fn insights(snapshot: &BusinessSnapshot, metrics: &KeyMetrics, trends: &[Trend], config: &AnalyticsConfig) -> Vec<Insight> {
    let mut insights = Vec::new();

    if snapshot.products.is_empty() {
        insights.push(Insight {
            title: "Build your catalog".to_string(),
            description: "Add products to start tracking inventory and sales.".to_string(),
        });
    }

    if metrics.total_revenue > 0.0 {
        let top = snapshot
            .customers
            .iter()
            .filter(|c| c.total_spent > 0.0)
            .max_by(|a, b| a.total_spent.total_cmp(&b.total_spent));
        if let Some(customer) = top {
            let share = customer.total_spent / metrics.total_revenue * 100.0;
            insights.push(Insight {
                title: format!("{} is your top customer", customer.name),
                description: format!(
                    "{} accounts for {:.1}% of all revenue across {} order(s).",
                    customer.name, share, customer.order_count
                ),
            });
        }
    }

    let best_margin = snapshot
        .products
        .iter()
        .filter_map(|p| p.margin_percent().map(|m| (p, m)))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((product, margin)) = best_margin {
        insights.push(Insight {
            title: format!("'{}' has your best margin", product.name),
            description: format!("{margin:.1}% gross margin per unit sold."),
        });
    }

    let fastest = trends
        .iter()
        .filter(|t| t.direction == TrendDirection::Up)
        .max_by(|a, b| a.change_percent.total_cmp(&b.change_percent));
    if let Some(t) = fastest {
        insights.push(Insight {
            title: format!("{} is growing", capitalize(t.metric.as_str())),
            description: format!(
                "{} is up {:.1}% over the previous {} days.",
                capitalize(t.metric.as_str()),
                t.change_percent,
                config.window.num_days()
            ),
        });
    }

    insights
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// == Dashboard ==
pub fn dashboard(snapshot: &BusinessSnapshot, now: DateTime<Utc>, config: &AnalyticsConfig) -> DashboardData {
    let metrics = key_metrics(snapshot, now, config);
    let trends = trends(&MetricKind::ALL, snapshot, now, config);
    let alerts = alerts(snapshot, now, config);
    let insights = insights(snapshot, &metrics, &trends, config);

    DashboardData {
        metrics,
        trends,
        alerts,
        insights,
        generated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Order, Product};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-30T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn product(name: &str, price: f64, cost: Option<f64>, stock: u32, created: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: None,
            price,
            cost,
            stock_quantity: stock,
            low_stock_threshold: None,
            created_at: days_ago(created),
            updated_at: days_ago(created),
        }
    }

    fn customer(name: &str, spent: f64, orders: u32, created: i64, last: Option<i64>) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            phone: None,
            total_spent: spent,
            order_count: orders,
            created_at: days_ago(created),
            last_purchase_at: last.map(days_ago),
        }
    }

    fn order(amount: f64, days: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: None,
            product_id: None,
            quantity: 1,
            amount,
            created_at: days_ago(days),
        }
    }

    fn config() -> AnalyticsConfig {
        AnalyticsConfig::default()
    }

    #[test]
    fn test_change_percent() {
        assert_eq!(change_percent(150.0, 100.0), 50.0);
        assert_eq!(change_percent(50.0, 100.0), -50.0);
        assert_eq!(change_percent(10.0, 0.0), 100.0);
        assert_eq!(change_percent(0.0, 0.0), 0.0);
        assert_eq!(change_percent(1.0, 3.0), -66.67);
    }

    #[test]
    fn test_direction_thresholds() {
        assert_eq!(direction(1.0), TrendDirection::Up);
        assert_eq!(direction(0.99), TrendDirection::Flat);
        assert_eq!(direction(-0.5), TrendDirection::Flat);
        assert_eq!(direction(-1.0), TrendDirection::Down);
    }

    #[test]
    fn test_key_metrics_empty_snapshot() {
        let metrics = key_metrics(&BusinessSnapshot::default(), now(), &config());

        assert_eq!(metrics.total_revenue, 0.0);
        assert_eq!(metrics.average_order_value, 0.0);
        assert_eq!(metrics.total_orders, 0);
        assert_eq!(metrics.period_days, 30);
    }

    #[test]
    fn test_key_metrics() {
        let snapshot = BusinessSnapshot {
            products: vec![
                product("Mug", 10.0, Some(4.0), 20, 90),
                product("Tea", 5.0, None, 3, 10),
            ],
            customers: vec![customer("Ada", 90.0, 2, 5, Some(1)), customer("Grace", 0.0, 0, 60, None)],
            orders: vec![order(40.0, 1), order(50.0, 20), order(30.0, 45)],
        };

        let metrics = key_metrics(&snapshot, now(), &config());

        assert_eq!(metrics.total_revenue, 120.0);
        assert_eq!(metrics.revenue_this_period, 90.0);
        assert_eq!(metrics.total_orders, 3);
        assert_eq!(metrics.average_order_value, 40.0);
        assert_eq!(metrics.total_customers, 2);
        assert_eq!(metrics.new_customers_this_period, 1);
        assert_eq!(metrics.total_products, 2);
        assert_eq!(metrics.inventory_value, 215.0);
        assert_eq!(metrics.low_stock_products, 1);
    }

    #[test]
    fn test_window_boundaries() {
        // Exactly 30 days ago belongs to the previous window, 60 days ago to neither.
        let snapshot = BusinessSnapshot {
            orders: vec![order(10.0, 0), order(20.0, 30), order(40.0, 60), order(80.0, 61)],
            ..Default::default()
        };

        let t = trend(MetricKind::Revenue, &snapshot, now(), &config());
        assert_eq!(t.current, 10.0);
        assert_eq!(t.previous, 20.0);
        assert_eq!(t.change_percent, -50.0);
        assert_eq!(t.direction, TrendDirection::Down);
    }

    #[test]
    fn test_oversized_window_saturates() {
        let config = AnalyticsConfig {
            window: Duration::days(100_000_000),
            ..config()
        };
        let snapshot = BusinessSnapshot {
            customers: vec![customer("Ada", 10.0, 1, 400, Some(400))],
            orders: vec![order(10.0, 1), order(20.0, 5000)],
            ..Default::default()
        };

        let data = dashboard(&snapshot, now(), &config);

        assert_eq!(data.metrics.revenue_this_period, 30.0);
        let revenue = data.trends.iter().find(|t| t.metric == MetricKind::Revenue).unwrap();
        assert_eq!(revenue.previous, 0.0);
        assert!(data.alerts.iter().all(|a| a.kind != AlertKind::InactiveCustomers));
    }

    #[test]
    fn test_trends_per_kind() {
        let snapshot = BusinessSnapshot {
            products: vec![product("Mug", 10.0, None, 50, 3)],
            customers: vec![customer("Ada", 0.0, 0, 2, None), customer("Bo", 0.0, 0, 40, None)],
            orders: vec![order(10.0, 1), order(10.0, 2), order(10.0, 35)],
        };

        let trends = trends(&MetricKind::ALL, &snapshot, now(), &config());

        let by_kind = |kind| trends.iter().find(|t| t.metric == kind).unwrap();
        assert_eq!(by_kind(MetricKind::Revenue).change_percent, 100.0);
        assert_eq!(by_kind(MetricKind::Orders).current, 2.0);
        assert_eq!(by_kind(MetricKind::Customers).direction, TrendDirection::Flat);
        assert_eq!(by_kind(MetricKind::Products).previous, 0.0);
        assert_eq!(by_kind(MetricKind::Products).direction, TrendDirection::Up);
    }

    #[test]
    fn test_stock_alerts() {
        let mut custom = product("Candle", 8.0, None, 15, 10);
        custom.low_stock_threshold = Some(20);
        let snapshot = BusinessSnapshot {
            products: vec![
                product("Mug", 10.0, None, 0, 10),
                product("Tea", 5.0, None, 4, 10),
                product("Plate", 5.0, None, 40, 10),
                custom,
            ],
            ..Default::default()
        };

        let alerts = alerts(&snapshot, now(), &config());

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].kind, AlertKind::OutOfStock);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts[1..].iter().all(|a| a.kind == AlertKind::LowStock));
        assert!(alerts.iter().all(|a| !a.message.contains("Plate")));
    }

    #[test]
    fn test_revenue_decline_alert() {
        let declining = BusinessSnapshot {
            orders: vec![order(70.0, 5), order(100.0, 40)],
            ..Default::default()
        };
        let alerts = alerts(&declining, now(), &config());
        assert!(alerts.iter().any(|a| a.kind == AlertKind::RevenueDecline));

        let mild = BusinessSnapshot {
            orders: vec![order(85.0, 5), order(100.0, 40)],
            ..Default::default()
        };
        let alerts = super::alerts(&mild, now(), &config());
        assert!(alerts.iter().all(|a| a.kind != AlertKind::RevenueDecline));
    }

    #[test]
    fn test_inactive_customer_alert() {
        let snapshot = BusinessSnapshot {
            customers: vec![
                customer("Ada", 10.0, 1, 100, Some(70)),
                customer("Bo", 10.0, 1, 100, Some(3)),
                customer("Cy", 0.0, 0, 100, None),
            ],
            ..Default::default()
        };

        let alerts = alerts(&snapshot, now(), &config());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::InactiveCustomers);
        assert!(alerts[0].message.starts_with("1 customer(s)"));
    }

    #[test]
    fn test_insights() {
        let snapshot = BusinessSnapshot {
            products: vec![product("Mug", 10.0, Some(4.0), 20, 90), product("Tea", 5.0, Some(1.0), 20, 90)],
            customers: vec![customer("Ada", 75.0, 3, 50, Some(1)), customer("Bo", 25.0, 1, 50, Some(2))],
            orders: vec![order(75.0, 1), order(25.0, 2)],
        };
        let metrics = key_metrics(&snapshot, now(), &config());
        let trends = trends(&MetricKind::ALL, &snapshot, now(), &config());

        let insights = insights(&snapshot, &metrics, &trends, &config());
        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();

        assert!(titles.contains(&"Ada is your top customer"));
        assert!(insights[0].description.contains("75.0%"));
        assert!(titles.contains(&"'Tea' has your best margin"));
        assert!(titles.contains(&"Revenue is growing") || titles.contains(&"Orders is growing"));
    }

    #[test]
    fn test_empty_catalog_insight() {
        let snapshot = BusinessSnapshot::default();
        let metrics = key_metrics(&snapshot, now(), &config());

        let insights = insights(&snapshot, &metrics, &[], &config());

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Build your catalog");
    }

    #[test]
    fn test_dashboard_assembles_all_parts() {
        let snapshot = BusinessSnapshot {
            products: vec![product("Mug", 10.0, None, 0, 10)],
            ..Default::default()
        };

        let data = dashboard(&snapshot, now(), &config());

        assert_eq!(data.trends.len(), 4);
        assert_eq!(data.alerts.len(), 1);
        assert_eq!(data.generated_at, now());
        assert_eq!(data.metrics.total_products, 1);
    }
}
