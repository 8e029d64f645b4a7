//! Error types for the application
//!
//! Provides unified error handling using thiserror. Every variant renders as
//! the standard error envelope.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request data failed validation
    #[error("Invalid value for '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// A requested dashboard metric does not exist
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    /// Missing, malformed or expired credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity absent for this user
    #[error("{resource} not found")]
    NotFound {
        resource: String,
        suggestion: Option<String>,
    },

    /// The advice generator failed
    #[error("Advice service failed: {0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            suggestion: None,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidField { .. } | Self::UnknownMetric(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidField { .. } | Self::UnknownMetric(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::InvalidField { field, .. } => Some(json!({ "field": field })),
            Self::UnknownMetric(_) => Some(json!({
                "supported": crate::dashboard::MetricKind::ALL
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
            })),
            _ => None,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { suggestion, .. } => suggestion.clone(),
            Self::Unauthorized(_) => {
                Some("Send a valid token as 'Authorization: Bearer <token>'".to_string())
            }
            Self::Upstream(_) => Some("Try again in a few minutes".to_string()),
            _ => None,
        }
    }
}

// == Extractor Rejections ==
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::invalid_field("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::invalid_field("path", rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse::new(self.code(), self.to_string(), self.details(), self.suggestion());
        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for handlers and services.
pub type Result<T> = std::result::Result<T, AppError>;
