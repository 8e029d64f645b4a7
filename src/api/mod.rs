//! API Module
//!
//! HTTP handlers and routing for the dashboard backend.
//!
//! # Endpoints
//! - `GET /health`, `GET /stats` - Liveness and cache statistics
//! - `/api/dashboard/...` - Cached dashboard panels and refresh
//! - `/api/marketing/...` - Cached marketing advice
//! - `/api/business-profile`, `/api/products`, `/api/customers`, `/api/orders` - Records

pub mod handlers;
pub mod records;
pub mod routes;

pub use handlers::*;
pub use records::*;
pub use routes::create_router;
