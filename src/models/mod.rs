//! Request, response and business models
//!
//! DTOs used for serializing/deserializing HTTP bodies, plus the business
//! records the dashboard and marketing panels are computed from.

pub mod business;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use business::{BusinessProfile, Customer, Order, Product};
pub use requests::{
    ContentQuery, CreateCustomerRequest, CreateOrderRequest, CreateProductRequest, ProfileRequest,
    SentimentRequest, StrategiesQuery, TrendsQuery, UpdateCustomerRequest, UpdateProductRequest,
};
pub use responses::{
    ApiResponse, DeletedResponse, ErrorBody, ErrorResponse, HealthResponse, InvalidationResponse,
    StatsResponse,
};
