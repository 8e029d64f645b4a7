//! Dashboard Service
//!
//! Serves the dashboard panels through the read-through cache. Every panel is
//! computed from a fresh repository snapshot on a miss and kept for
//! `ttl::DASHBOARD`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::{keys, ttl, CacheService};
use crate::dashboard::analytics::{self, AnalyticsConfig};
use crate::dashboard::models::{DashboardData, KeyMetrics, MetricKind, Trend};
use crate::error::{AppError, Result};
use crate::repository::Repository;

#[derive(Clone)]
pub struct DashboardService {
    cache: CacheService,
    repository: Arc<Repository>,
    config: AnalyticsConfig,
}

impl DashboardService {
    pub fn new(cache: CacheService, repository: Arc<Repository>, config: AnalyticsConfig) -> Self {
        Self {
            cache,
            repository,
            config,
        }
    }

    /// Full dashboard payload for `user_id`.
    pub async fn dashboard(&self, user_id: &str) -> Result<DashboardData> {
        let key = keys::dashboard_data(user_id);
        self.cache
            .get_or_set(&key, ttl::DASHBOARD, || async move {
                debug!("Computing dashboard for user '{}'", user_id);
                let snapshot = self.repository.snapshot(user_id).await;
                Ok::<_, AppError>(analytics::dashboard(&snapshot, Utc::now(), &self.config))
            })
            .await
    }

    pub async fn metrics(&self, user_id: &str) -> Result<KeyMetrics> {
        let key = keys::dashboard_metrics(user_id);
        self.cache
            .get_or_set(&key, ttl::DASHBOARD, || async move {
                let snapshot = self.repository.snapshot(user_id).await;
                Ok::<_, AppError>(analytics::key_metrics(&snapshot, Utc::now(), &self.config))
            })
            .await
    }

    /// Trends for `kinds`, in the order given.
    ///
    /// The cache key ignores ordering, so callers should pass the output of
    /// [`DashboardService::parse_metrics`].
    pub async fn trends(&self, user_id: &str, kinds: &[MetricKind]) -> Result<Vec<Trend>> {
        let names: Vec<&str> = kinds.iter().map(|kind| kind.as_str()).collect();
        let key = keys::dashboard_trends(user_id, &names);
        self.cache
            .get_or_set(&key, ttl::DASHBOARD, || async move {
                let snapshot = self.repository.snapshot(user_id).await;
                Ok::<_, AppError>(analytics::trends(kinds, &snapshot, Utc::now(), &self.config))
            })
            .await
    }

    /// Drops every cached dashboard entry of `user_id`. Returns the number of
    /// entries removed.
    pub async fn invalidate(&self, user_id: &str) -> u64 {
        let mut removed = 0;
        for pattern in keys::dashboard_invalidation_patterns(user_id) {
            removed += self.cache.delete_pattern(&pattern).await;
        }
        info!("Invalidated {} dashboard entries for user '{}'", removed, user_id);
        removed
    }

    /// Parses a comma-separated metric list.
    ///
    /// Blank input selects every metric. The result is deduplicated and in
    /// canonical order.
    pub fn parse_metrics(raw: Option<&str>) -> Result<Vec<MetricKind>> {
        let mut kinds = raw
            .unwrap_or_default()
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse::<MetricKind>)
            .collect::<Result<Vec<_>>>()?;

        if kinds.is_empty() {
            return Ok(MetricKind::ALL.to_vec());
        }

        kinds.sort_unstable();
        kinds.dedup();
        Ok(kinds)
    }
}
