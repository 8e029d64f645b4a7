//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming request bodies and query strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Longest accepted free-text name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Most feedback entries accepted for one sentiment analysis.
pub const MAX_FEEDBACK_ENTRIES: usize = 100;

/// Largest accepted price, cost or order amount. Keeps stock valuations and
/// revenue sums finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Bounds for the number of content suggestions per request.
pub const MAX_CONTENT_COUNT: u32 = 20;
pub const DEFAULT_CONTENT_COUNT: u32 = 5;

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(field, "cannot be empty"));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(AppError::invalid_field(
            field,
            format!("exceeds maximum length of {MAX_NAME_LENGTH} characters"),
        ));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::invalid_field(field, "must be a non-negative number"));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::invalid_field(
            field,
            format!("cannot exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Body of PUT /api/business-profile
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub business_name: String,
    pub industry: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Result<()> {
        require_name("business_name", &self.business_name)?;
        require_name("industry", &self.industry)
    }
}

/// Body of POST /api/products
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<()> {
        require_name("name", &self.name)?;
        require_amount("price", self.price)?;
        if let Some(cost) = self.cost {
            require_amount("cost", cost)?;
        }
        Ok(())
    }
}

/// Body of PUT /api/products/:id; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock_quantity: Option<u32>,
    pub low_stock_threshold: Option<u32>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        if let Some(price) = self.price {
            require_amount("price", price)?;
        }
        if let Some(cost) = self.cost {
            require_amount("cost", cost)?;
        }
        Ok(())
    }
}

/// Body of POST /api/customers
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateCustomerRequest {
    pub fn validate(&self) -> Result<()> {
        require_name("name", &self.name)?;
        validate_email(self.email.as_deref())
    }
}

/// Body of PUT /api/customers/:id; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateCustomerRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require_name("name", name)?;
        }
        validate_email(self.email.as_deref())
    }
}

fn validate_email(email: Option<&str>) -> Result<()> {
    match email {
        Some(email) if !email.contains('@') || email.starts_with('@') || email.ends_with('@') => {
            Err(AppError::invalid_field("email", "is not a valid address"))
        }
        _ => Ok(()),
    }
}

/// Body of POST /api/orders
///
/// `amount` defaults to `price × quantity` when a product is given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Backdates the sale; defaults to now
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<()> {
        if self.quantity == Some(0) {
            return Err(AppError::invalid_field("quantity", "must be at least 1"));
        }
        match self.amount {
            Some(amount) => require_amount("amount", amount)?,
            None if self.product_id.is_none() => {
                return Err(AppError::invalid_field(
                    "amount",
                    "is required when no product is given",
                ));
            }
            None => {}
        }
        if self.occurred_at.is_some_and(|at| at > Utc::now()) {
            return Err(AppError::invalid_field("occurred_at", "cannot be in the future"));
        }
        Ok(())
    }
}

/// Body of POST /api/marketing/sentiment
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentRequest {
    pub feedback: Vec<String>,
    /// Caller-chosen identifier for the feedback set
    #[serde(default)]
    pub id: Option<String>,
}

impl SentimentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.feedback.is_empty() {
            return Err(AppError::invalid_field("feedback", "cannot be empty"));
        }
        if self.feedback.len() > MAX_FEEDBACK_ENTRIES {
            return Err(AppError::invalid_field(
                "feedback",
                format!("accepts at most {MAX_FEEDBACK_ENTRIES} entries"),
            ));
        }
        if let Some(id) = &self.id {
            require_name("id", id)?;
        }
        Ok(())
    }
}

/// Query of GET /api/dashboard/trends: comma-separated metric names
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendsQuery {
    pub metrics: Option<String>,
}

/// Query of GET /api/marketing/strategies
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategiesQuery {
    pub budget: Option<f64>,
}

impl StrategiesQuery {
    pub fn validate(&self) -> Result<()> {
        match self.budget {
            Some(budget) if !budget.is_finite() || budget <= 0.0 => {
                Err(AppError::invalid_field("budget", "must be a positive number"))
            }
            _ => Ok(()),
        }
    }
}

/// Query of GET /api/marketing/content
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
    pub count: Option<u32>,
}

impl ContentQuery {
    /// Validated count, defaulting when absent.
    pub fn count(&self) -> Result<u32> {
        match self.count {
            None => Ok(DEFAULT_CONTENT_COUNT),
            Some(count) if (1..=MAX_CONTENT_COUNT).contains(&count) => Ok(count),
            Some(_) => Err(AppError::invalid_field(
                "count",
                format!("must be between 1 and {MAX_CONTENT_COUNT}"),
            )),
        }
    }
}
