//! Business Data Repository
//!
//! In-memory tables for profiles, products, customers and orders, all scoped by
//! the owning user id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    BusinessProfile, CreateCustomerRequest, CreateOrderRequest, CreateProductRequest, Customer,
    Order, Product, ProfileRequest, UpdateCustomerRequest, UpdateProductRequest,
};

/// Everything the dashboard needs about one user, read under a single lock.
#[derive(Debug, Clone, Default)]
pub struct BusinessSnapshot {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<String, BusinessProfile>,
    products: HashMap<String, HashMap<Uuid, Product>>,
    customers: HashMap<String, HashMap<Uuid, Customer>>,
    orders: HashMap<String, Vec<Order>>,
}

// == Repository ==
#[derive(Debug, Default)]
pub struct Repository {
    tables: RwLock<Tables>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // == Business Profile ==
    pub async fn profile(&self, user_id: &str) -> Option<BusinessProfile> {
        self.tables.read().await.profiles.get(user_id).cloned()
    }

    /// Creates or replaces the user's profile.
    pub async fn upsert_profile(&self, user_id: &str, req: ProfileRequest) -> BusinessProfile {
        let profile = BusinessProfile {
            user_id: user_id.to_string(),
            business_name: req.business_name.trim().to_string(),
            industry: req.industry.trim().to_string(),
            description: req.description,
            target_audience: req.target_audience,
            location: req.location,
            updated_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .profiles
            .insert(user_id.to_string(), profile.clone());
        profile
    }

    // == Products ==
    /// Lists products, oldest first.
    pub async fn list_products(&self, user_id: &str) -> Vec<Product> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .get(user_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        products
    }

    pub async fn create_product(&self, user_id: &str, req: CreateProductRequest) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            category: req.category,
            price: req.price,
            cost: req.cost,
            stock_quantity: req.stock_quantity,
            low_stock_threshold: req.low_stock_threshold,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .products
            .entry(user_id.to_string())
            .or_default()
            .insert(product.id, product.clone());
        debug!("Created product {} for user {}", product.id, user_id);
        product
    }

    pub async fn update_product(
        &self,
        user_id: &str,
        id: Uuid,
        req: UpdateProductRequest,
    ) -> Result<Product> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(user_id)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| AppError::not_found("Product"))?;

        if let Some(name) = req.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = req.category {
            product.category = Some(category);
        }
        if let Some(price) = req.price {
            product.price = price;
        }
        if let Some(cost) = req.cost {
            product.cost = Some(cost);
        }
        if let Some(stock) = req.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(threshold) = req.low_stock_threshold {
            product.low_stock_threshold = Some(threshold);
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    pub async fn delete_product(&self, user_id: &str, id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .products
            .get_mut(user_id)
            .and_then(|rows| rows.remove(&id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Product"))
    }

    // == Customers ==
    /// Lists customers, oldest first.
    pub async fn list_customers(&self, user_id: &str) -> Vec<Customer> {
        let tables = self.tables.read().await;
        let mut customers: Vec<Customer> = tables
            .customers
            .get(user_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default();
        customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        customers
    }

    pub async fn create_customer(&self, user_id: &str, req: CreateCustomerRequest) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            email: req.email,
            phone: req.phone,
            total_spent: 0.0,
            order_count: 0,
            created_at: Utc::now(),
            last_purchase_at: None,
        };
        self.tables
            .write()
            .await
            .customers
            .entry(user_id.to_string())
            .or_default()
            .insert(customer.id, customer.clone());
        debug!("Created customer {} for user {}", customer.id, user_id);
        customer
    }

    pub async fn update_customer(
        &self,
        user_id: &str,
        id: Uuid,
        req: UpdateCustomerRequest,
    ) -> Result<Customer> {
        let mut tables = self.tables.write().await;
        let customer = tables
            .customers
            .get_mut(user_id)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| AppError::not_found("Customer"))?;

        if let Some(name) = req.name {
            customer.name = name.trim().to_string();
        }
        if let Some(email) = req.email {
            customer.email = Some(email);
        }
        if let Some(phone) = req.phone {
            customer.phone = Some(phone);
        }
        Ok(customer.clone())
    }

    pub async fn delete_customer(&self, user_id: &str, id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .customers
            .get_mut(user_id)
            .and_then(|rows| rows.remove(&id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Customer"))
    }

    // == Orders ==
    /// Lists orders, newest first.
    pub async fn list_orders(&self, user_id: &str) -> Vec<Order> {
        let tables = self.tables.read().await;
        let mut orders = tables.orders.get(user_id).cloned().unwrap_or_default();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Records a sale, drawing down product stock and crediting the customer.
    ///
    /// All checks happen before anything is modified.
    pub async fn record_order(&self, user_id: &str, req: CreateOrderRequest) -> Result<Order> {
        let quantity = req.quantity.unwrap_or(1);
        let created_at = req.occurred_at.unwrap_or_else(Utc::now);

        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let amount = match req.product_id {
            Some(product_id) => {
                let product = tables
                    .products
                    .get(user_id)
                    .and_then(|rows| rows.get(&product_id))
                    .ok_or_else(|| AppError::not_found("Product"))?;
                if product.stock_quantity < quantity {
                    return Err(AppError::invalid_field(
                        "quantity",
                        format!("only {} in stock", product.stock_quantity),
                    ));
                }
                req.amount.unwrap_or(product.price * f64::from(quantity))
            }
            None => req
                .amount
                .ok_or_else(|| AppError::invalid_field("amount", "is required when no product is given"))?,
        };

        if let Some(customer_id) = req.customer_id {
            let known = tables
                .customers
                .get(user_id)
                .is_some_and(|rows| rows.contains_key(&customer_id));
            if !known {
                return Err(AppError::not_found("Customer"));
            }
        }

        if let Some(id) = req.product_id {
            if let Some(product) = tables.products.get_mut(user_id).and_then(|rows| rows.get_mut(&id)) {
                product.stock_quantity -= quantity;
                product.updated_at = Utc::now();
            }
        }

        if let Some(id) = req.customer_id {
            if let Some(customer) = tables.customers.get_mut(user_id).and_then(|rows| rows.get_mut(&id)) {
                customer.total_spent += amount;
                customer.order_count += 1;
                customer.last_purchase_at = Some(latest(customer.last_purchase_at, created_at));
            }
        }

        let order = Order {
            id: Uuid::new_v4(),
            customer_id: req.customer_id,
            product_id: req.product_id,
            quantity,
            amount,
            created_at,
        };
        tables
            .orders
            .entry(user_id.to_string())
            .or_default()
            .push(order.clone());
        debug!("Recorded order {} ({:.2}) for user {}", order.id, amount, user_id);
        Ok(order)
    }

    // == Snapshot ==
    pub async fn snapshot(&self, user_id: &str) -> BusinessSnapshot {
        let tables = self.tables.read().await;
        BusinessSnapshot {
            products: tables
                .products
                .get(user_id)
                .map(|rows| rows.values().cloned().collect())
                .unwrap_or_default(),
            customers: tables
                .customers
                .get(user_id)
                .map(|rows| rows.values().cloned().collect())
                .unwrap_or_default(),
            orders: tables.orders.get(user_id).cloned().unwrap_or_default(),
        }
    }
}

fn latest(current: Option<DateTime<Utc>>, candidate: DateTime<Utc>) -> DateTime<Utc> {
    match current {
        Some(existing) if existing > candidate => existing,
        _ => candidate,
    }
}
