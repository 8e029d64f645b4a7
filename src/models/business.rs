//! Business records owned by a user: profile, products, customers and orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One profile per user; feeds the marketing advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub user_id: String,
    pub business_name: String,
    pub industry: String,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    /// Unit cost, when known
    pub cost: Option<f64>,
    pub stock_quantity: u32,
    /// Overrides the configured low-stock threshold
    pub low_stock_threshold: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Gross margin in percent, when the cost is known.
    pub fn margin_percent(&self) -> Option<f64> {
        match self.cost {
            Some(cost) if self.price > 0.0 => Some((self.price - cost) / self.price * 100.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_spent: f64,
    pub order_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_purchase_at: Option<DateTime<Utc>>,
}

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub quantity: u32,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, cost: Option<f64>) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Mug".to_string(),
            category: None,
            price,
            cost,
            stock_quantity: 1,
            low_stock_threshold: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_margin_percent() {
        assert_eq!(product(20.0, Some(5.0)).margin_percent(), Some(75.0));
        assert_eq!(product(20.0, None).margin_percent(), None);
        assert_eq!(product(0.0, Some(1.0)).margin_percent(), None);
    }
}
