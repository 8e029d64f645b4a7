//! Record Handlers
//!
//! CRUD endpoints for the business profile, products, customers and orders.
//! Writes that feed the dashboard drop the user's cached dashboard; profile
//! writes drop the cached marketing advice.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::handlers::AppState;
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::{
    ApiResponse, BusinessProfile, CreateCustomerRequest, CreateOrderRequest,
    CreateProductRequest, Customer, DeletedResponse, Order, Product, ProfileRequest,
    UpdateCustomerRequest, UpdateProductRequest,
};

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type IdPath = std::result::Result<Path<Uuid>, PathRejection>;

type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>)>;

fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// == Business Profile ==
/// Handler for GET /api/business-profile
pub async fn get_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<BusinessProfile>>> {
    let profile = state
        .repository
        .profile(user.id())
        .await
        .ok_or_else(|| AppError::NotFound {
            resource: "Business profile".to_string(),
            suggestion: Some("Create one with PUT /api/business-profile".to_string()),
        })?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Handler for PUT /api/business-profile
pub async fn put_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: JsonBody<ProfileRequest>,
) -> Result<Json<ApiResponse<BusinessProfile>>> {
    let Json(req) = payload?;
    req.validate()?;

    let profile = state.repository.upsert_profile(user.id(), req).await;
    state.marketing.invalidate(user.id()).await;
    Ok(Json(ApiResponse::success(profile)))
}

// == Products ==
/// Handler for GET /api/products
pub async fn list_products_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ApiResponse<Vec<Product>>> {
    Json(ApiResponse::success(
        state.repository.list_products(user.id()).await,
    ))
}

/// Handler for POST /api/products
pub async fn create_product_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: JsonBody<CreateProductRequest>,
) -> Created<Product> {
    let Json(req) = payload?;
    req.validate()?;

    let product = state.repository.create_product(user.id(), req).await;
    state.dashboard.invalidate(user.id()).await;
    created(product)
}

/// Handler for PUT /api/products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    user: AuthUser,
    id: IdPath,
    payload: JsonBody<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    req.validate()?;

    let product = state.repository.update_product(user.id(), id, req).await?;
    state.dashboard.invalidate(user.id()).await;
    Ok(Json(ApiResponse::success(product)))
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    user: AuthUser,
    id: IdPath,
) -> Result<Json<ApiResponse<DeletedResponse>>> {
    let Path(id) = id?;
    state.repository.delete_product(user.id(), id).await?;
    state.dashboard.invalidate(user.id()).await;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

// == Customers ==
/// Handler for GET /api/customers
pub async fn list_customers_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ApiResponse<Vec<Customer>>> {
    Json(ApiResponse::success(
        state.repository.list_customers(user.id()).await,
    ))
}

/// Handler for POST /api/customers
pub async fn create_customer_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: JsonBody<CreateCustomerRequest>,
) -> Created<Customer> {
    let Json(req) = payload?;
    req.validate()?;

    let customer = state.repository.create_customer(user.id(), req).await;
    state.dashboard.invalidate(user.id()).await;
    created(customer)
}

/// Handler for PUT /api/customers/:id
pub async fn update_customer_handler(
    State(state): State<AppState>,
    user: AuthUser,
    id: IdPath,
    payload: JsonBody<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    req.validate()?;

    let customer = state.repository.update_customer(user.id(), id, req).await?;
    state.dashboard.invalidate(user.id()).await;
    Ok(Json(ApiResponse::success(customer)))
}

/// Handler for DELETE /api/customers/:id
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    user: AuthUser,
    id: IdPath,
) -> Result<Json<ApiResponse<DeletedResponse>>> {
    let Path(id) = id?;
    state.repository.delete_customer(user.id(), id).await?;
    state.dashboard.invalidate(user.id()).await;
    Ok(Json(ApiResponse::success(DeletedResponse::new(id))))
}

// == Orders ==
/// Handler for GET /api/orders
pub async fn list_orders_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ApiResponse<Vec<Order>>> {
    Json(ApiResponse::success(state.repository.list_orders(user.id()).await))
}

/// Handler for POST /api/orders
pub async fn create_order_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: JsonBody<CreateOrderRequest>,
) -> Created<Order> {
    let Json(req) = payload?;
    req.validate()?;

    let order = state.repository.record_order(user.id(), req).await?;
    state.dashboard.invalidate(user.id()).await;
    created(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::MemoryStore;
    use crate::config::Config;

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new(100)), &Config::default())
    }

    fn user() -> AuthUser {
        AuthUser("u1".to_string())
    }

    fn mug() -> CreateProductRequest {
        CreateProductRequest {
            name: "Mug".to_string(),
            category: None,
            price: 12.0,
            cost: Some(4.0),
            stock_quantity: 10,
            low_stock_threshold: None,
        }
    }

    #[tokio::test]
    async fn test_profile_roundtrip() {
        let state = state();

        let missing = get_profile_handler(State(state.clone()), user()).await;
        assert!(matches!(missing, Err(AppError::NotFound { suggestion: Some(_), .. })));

        let req = ProfileRequest {
            business_name: "Corner Cafe".to_string(),
            industry: "Food".to_string(),
            description: None,
            target_audience: None,
            location: None,
        };
        put_profile_handler(State(state.clone()), user(), Ok(Json(req)))
            .await
            .unwrap();

        let profile = get_profile_handler(State(state), user()).await.unwrap();
        assert_eq!(profile.data.business_name, "Corner Cafe");
    }

    #[tokio::test]
    async fn test_create_product_invalidates_dashboard() {
        let state = state();
        let before = state.dashboard.metrics("u1").await.unwrap();
        assert_eq!(before.total_products, 0);

        let (status, _) = create_product_handler(State(state.clone()), user(), Ok(Json(mug())))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let after = state.dashboard.metrics("u1").await.unwrap();
        assert_eq!(after.total_products, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_product() {
        let state = state();
        let id = Uuid::new_v4();

        let result = update_product_handler(
            State(state.clone()),
            user(),
            Ok(Path(id)),
            Ok(Json(UpdateProductRequest::default())),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));

        let result = delete_product_handler(State(state), user(), Ok(Path(id))).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_order_draws_down_stock() {
        let state = state();
        let (_, Json(product)) = create_product_handler(State(state.clone()), user(), Ok(Json(mug())))
            .await
            .unwrap();

        let req = CreateOrderRequest {
            product_id: Some(product.data.id),
            quantity: Some(3),
            ..Default::default()
        };
        let (_, Json(order)) = create_order_handler(State(state.clone()), user(), Ok(Json(req)))
            .await
            .unwrap();
        assert_eq!(order.data.amount, 36.0);

        let products = list_products_handler(State(state), user()).await;
        assert_eq!(products.data[0].stock_quantity, 7);
    }

    #[tokio::test]
    async fn test_create_customer_validates() {
        let req = CreateCustomerRequest {
            name: String::new(),
            email: None,
            phone: None,
        };

        let result = create_customer_handler(State(state()), user(), Ok(Json(req))).await;

        assert!(matches!(result, Err(AppError::InvalidField { .. })));
    }
}
