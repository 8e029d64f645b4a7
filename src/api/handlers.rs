//! API Handlers
//!
//! Shared application state plus the system, dashboard and marketing
//! endpoints. Record CRUD lives in `records`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Duration;

use crate::auth::{AuthUser, TokenVerifier};
use crate::cache::{CacheService, KeyValueStore};
use crate::config::{clamp_trend_window_days, Config};
use crate::dashboard::{AnalyticsConfig, DashboardData, DashboardService, KeyMetrics, Trend};
use crate::error::Result;
use crate::marketing::{
    AdviceGenerator, ContentSuggestion, MarketingService, MarketingStrategy, RuleBasedAdvisor,
    SentimentReport,
};
use crate::models::{
    ApiResponse, ContentQuery, HealthResponse, InvalidationResponse, SentimentRequest,
    StatsResponse, StrategiesQuery, TrendsQuery,
};
use crate::repository::Repository;

/// Application state shared across all handlers.
///
/// Every field is a cheap handle; cloning the state shares the same store,
/// repository and counters.
#[derive(Clone)]
pub struct AppState {
    pub cache: CacheService,
    pub repository: Arc<Repository>,
    pub dashboard: DashboardService,
    pub marketing: MarketingService,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    /// Creates the state over `store` with the bundled rule-based advisor.
    pub fn new(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::with_advisor(store, config, Arc::new(RuleBasedAdvisor::new()))
    }

    pub fn with_advisor(
        store: Arc<dyn KeyValueStore>,
        config: &Config,
        advisor: Arc<dyn AdviceGenerator>,
    ) -> Self {
        let cache = CacheService::new(store);
        let repository = Arc::new(Repository::new());
        let analytics = AnalyticsConfig {
            window: Duration::days(clamp_trend_window_days(config.trend_window_days)),
            low_stock_threshold: config.low_stock_threshold,
        };

        Self {
            dashboard: DashboardService::new(cache.clone(), repository.clone(), analytics),
            marketing: MarketingService::new(cache.clone(), repository.clone(), advisor),
            tokens: Arc::new(TokenVerifier::new(&config.jwt_secret)),
            cache,
            repository,
        }
    }
}

// == System ==
/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse::healthy(
        state.cache.backend_name(),
    )))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<ApiResponse<StatsResponse>> {
    Json(ApiResponse::success(state.cache.stats().into()))
}

// == Dashboard ==
/// Handler for GET /api/dashboard
pub async fn dashboard_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<DashboardData>>> {
    let data = state.dashboard.dashboard(user.id()).await?;
    Ok(Json(ApiResponse::success(data)))
}

/// Handler for GET /api/dashboard/metrics
pub async fn metrics_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<KeyMetrics>>> {
    let metrics = state.dashboard.metrics(user.id()).await?;
    Ok(Json(ApiResponse::success(metrics)))
}

/// Handler for GET /api/dashboard/trends?metrics=revenue,orders
///
/// Unknown metric names fail before the cache is consulted.
pub async fn trends_handler(
    State(state): State<AppState>,
    user: AuthUser,
    query: std::result::Result<Query<TrendsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Trend>>>> {
    let Query(query) = query?;
    let kinds = DashboardService::parse_metrics(query.metrics.as_deref())?;
    let trends = state.dashboard.trends(user.id(), &kinds).await?;
    Ok(Json(ApiResponse::success(trends)))
}

/// Handler for POST /api/dashboard/refresh
pub async fn refresh_dashboard_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<ApiResponse<InvalidationResponse>> {
    let invalidated = state.dashboard.invalidate(user.id()).await;
    Json(ApiResponse::success(InvalidationResponse { invalidated }))
}

// == Marketing ==
/// Handler for GET /api/marketing/strategies?budget=1000
pub async fn strategies_handler(
    State(state): State<AppState>,
    user: AuthUser,
    query: std::result::Result<Query<StrategiesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<MarketingStrategy>>>> {
    let Query(query) = query?;
    query.validate()?;
    let strategies = state.marketing.strategies(user.id(), query.budget).await?;
    Ok(Json(ApiResponse::success(strategies)))
}

/// Handler for GET /api/marketing/content?count=5
pub async fn content_handler(
    State(state): State<AppState>,
    user: AuthUser,
    query: std::result::Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ContentSuggestion>>>> {
    let Query(query) = query?;
    let count = query.count()?;
    let suggestions = state.marketing.content_suggestions(user.id(), count).await?;
    Ok(Json(ApiResponse::success(suggestions)))
}

/// Handler for POST /api/marketing/sentiment
pub async fn sentiment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SentimentReport>>> {
    let Json(req) = payload?;
    req.validate()?;
    let report = state
        .marketing
        .analyze_sentiment(user.id(), &req.feedback, req.id.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(report)))
}
