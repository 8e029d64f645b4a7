//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    content_handler, dashboard_handler, health_handler, metrics_handler,
    refresh_dashboard_handler, sentiment_handler, stats_handler, strategies_handler,
    trends_handler, AppState,
};
use super::records::{
    create_customer_handler, create_order_handler, create_product_handler,
    delete_customer_handler, delete_product_handler, get_profile_handler,
    list_customers_handler, list_orders_handler, list_products_handler, put_profile_handler,
    update_customer_handler, update_product_handler,
};

/// Creates the main router with all endpoints configured.
///
/// `/health` and `/stats` are public; everything under `/api` requires a
/// bearer token.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/dashboard/metrics", get(metrics_handler))
        .route("/dashboard/trends", get(trends_handler))
        .route("/dashboard/refresh", post(refresh_dashboard_handler))
        .route("/marketing/strategies", get(strategies_handler))
        .route("/marketing/content", get(content_handler))
        .route("/marketing/sentiment", post(sentiment_handler))
        .route(
            "/business-profile",
            get(get_profile_handler).put(put_profile_handler),
        )
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .route(
            "/customers",
            get(list_customers_handler).post(create_customer_handler),
        )
        .route(
            "/customers/:id",
            put(update_customer_handler).delete(delete_customer_handler),
        )
        .route("/orders", get(list_orders_handler).post(create_order_handler));

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
