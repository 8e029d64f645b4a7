//! bizdash - Small-business dashboard backend
//!
//! Serves dashboard analytics and marketing advice through a read-through
//! cache backed by Redis or an in-memory store.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod marketing;
pub mod models;
pub mod repository;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
