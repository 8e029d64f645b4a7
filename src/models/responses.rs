//! Response DTOs for the HTTP API
//!
//! Every body is wrapped in the success or error envelope.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cache::CacheStats;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Error payload inside the error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// RFC 3339 time the error was produced
    pub timestamp: String,
}

/// Error envelope: `{"success": false, "error": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
        suggestion: Option<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details,
                suggestion,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active cache backend
    pub cache_backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(cache_backend: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_backend: cache_backend.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Result of a cache invalidation sweep.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationResponse {
    /// Number of cache entries removed
    pub invalidated: u64,
}

/// Identifier of a removed record.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub id: Uuid,
    pub deleted: bool,
}

impl DeletedResponse {
    pub fn new(id: Uuid) -> Self {
        Self { id, deleted: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn test_error_envelope_omits_empty_fields() {
        let resp = ErrorResponse::new("NOT_FOUND", "Product not found", None, None);
        let json = serde_json::to_value(resp).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert!(json["error"].get("details").is_none());
        assert!(json["error"].get("suggestion").is_none());
        assert!(json["error"]["timestamp"].is_string());
    }

    #[test]
    fn test_stats_response_flattens() {
        let stats = CacheStats {
            backend: "memory",
            hits: 8,
            misses: 2,
            writes: 3,
            deletes: 0,
            store_errors: 0,
        };
        let json = serde_json::to_value(StatsResponse::from(stats)).unwrap();
        assert_eq!(json["backend"], "memory");
        assert_eq!(json["hits"], 8);
        assert!((json["hit_rate"].as_f64().unwrap() - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy("memory")).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
