//! Marketing Service
//!
//! Caches the advice panels. Strategies and content ideas are derived from the
//! user's business profile, so they are dropped whenever the profile changes.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{keys, ttl, CacheService};
use crate::error::{AppError, Result};
use crate::marketing::advisor::AdviceGenerator;
use crate::marketing::models::{ContentSuggestion, MarketingStrategy, SentimentReport};
use crate::models::BusinessProfile;
use crate::repository::Repository;

#[derive(Clone)]
pub struct MarketingService {
    cache: CacheService,
    repository: Arc<Repository>,
    advisor: Arc<dyn AdviceGenerator>,
}

impl MarketingService {
    pub fn new(cache: CacheService, repository: Arc<Repository>, advisor: Arc<dyn AdviceGenerator>) -> Self {
        Self {
            cache,
            repository,
            advisor,
        }
    }

    async fn require_profile(&self, user_id: &str) -> Result<BusinessProfile> {
        self.repository
            .profile(user_id)
            .await
            .ok_or_else(|| AppError::NotFound {
                resource: "Business profile".to_string(),
                suggestion: Some(
                    "Create one with PUT /api/business-profile before requesting marketing advice"
                        .to_string(),
                ),
            })
    }

    pub async fn strategies(&self, user_id: &str, budget: Option<f64>) -> Result<Vec<MarketingStrategy>> {
        let profile = self.require_profile(user_id).await?;
        let key = keys::marketing_strategies(user_id, budget);
        self.cache
            .get_or_set(&key, ttl::MARKETING_STRATEGIES, || async move {
                debug!("Generating strategies for user '{}'", user_id);
                Ok::<_, AppError>(self.advisor.strategies(&profile, budget).await?)
            })
            .await
    }

    pub async fn content_suggestions(&self, user_id: &str, count: u32) -> Result<Vec<ContentSuggestion>> {
        let profile = self.require_profile(user_id).await?;
        let key = keys::content_suggestions(user_id, count);
        self.cache
            .get_or_set(&key, ttl::CONTENT_SUGGESTIONS, || async move {
                debug!("Generating {} content suggestions for user '{}'", count, user_id);
                Ok::<_, AppError>(self.advisor.content_suggestions(&profile, count).await?)
            })
            .await
    }

    /// Sentiment for one user's feedback set.
    ///
    /// The cache key covers the user, the optional `label` and the entries
    /// themselves, so a reused label never returns another set's report.
    pub async fn analyze_sentiment(
        &self,
        user_id: &str,
        feedback: &[String],
        label: Option<&str>,
    ) -> Result<SentimentReport> {
        let key = keys::sentiment_analysis(&keys::scoped_sentiment_id(user_id, label, feedback));
        self.cache
            .get_or_set(&key, ttl::SENTIMENT_ANALYSIS, || async move {
                Ok::<_, AppError>(self.advisor.analyze_sentiment(feedback).await?)
            })
            .await
    }

    /// Drops the user's cached strategies and content ideas.
    pub async fn invalidate(&self, user_id: &str) -> u64 {
        let removed = self
            .cache
            .delete_pattern(&keys::marketing_invalidation_pattern(user_id))
            .await;
        info!("Invalidated {} marketing entries for user '{}'", removed, user_id);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::cache::MemoryStore;
    use crate::marketing::advisor::{AdvisorError, RuleBasedAdvisor};
    use crate::models::ProfileRequest;

    /// Delegates to the rule-based advisor and counts calls.
    #[derive(Default)]
    struct CountingAdvisor {
        calls: AtomicUsize,
        inner: RuleBasedAdvisor,
    }

    #[async_trait]
    impl AdviceGenerator for CountingAdvisor {
        async fn strategies(
            &self,
            profile: &BusinessProfile,
            budget: Option<f64>,
        ) -> std::result::Result<Vec<MarketingStrategy>, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.strategies(profile, budget).await
        }

        async fn content_suggestions(
            &self,
            profile: &BusinessProfile,
            count: u32,
        ) -> std::result::Result<Vec<ContentSuggestion>, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.content_suggestions(profile, count).await
        }

        async fn analyze_sentiment(
            &self,
            feedback: &[String],
        ) -> std::result::Result<SentimentReport, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.analyze_sentiment(feedback).await
        }
    }

    struct FailingAdvisor;

    #[async_trait]
    impl AdviceGenerator for FailingAdvisor {
        async fn strategies(
            &self,
            _: &BusinessProfile,
            _: Option<f64>,
        ) -> std::result::Result<Vec<MarketingStrategy>, AdvisorError> {
            Err(AdvisorError::Unavailable("connection reset".to_string()))
        }

        async fn content_suggestions(
            &self,
            _: &BusinessProfile,
            _: u32,
        ) -> std::result::Result<Vec<ContentSuggestion>, AdvisorError> {
            Err(AdvisorError::InvalidResponse("empty body".to_string()))
        }

        async fn analyze_sentiment(&self, _: &[String]) -> std::result::Result<SentimentReport, AdvisorError> {
            Err(AdvisorError::Unavailable("connection reset".to_string()))
        }
    }

    fn profile_request(industry: &str) -> ProfileRequest {
        ProfileRequest {
            business_name: "Corner Cafe".to_string(),
            industry: industry.to_string(),
            description: None,
            target_audience: None,
            location: None,
        }
    }

    async fn service_with(advisor: Arc<dyn AdviceGenerator>) -> (MarketingService, Arc<Repository>, CacheService) {
        let repository = Arc::new(Repository::new());
        repository.upsert_profile("u1", profile_request("cafe")).await;
        let cache = CacheService::new(Arc::new(MemoryStore::default()));
        let service = MarketingService::new(cache.clone(), repository.clone(), advisor);
        (service, repository, cache)
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let (service, _, cache) = service_with(Arc::new(RuleBasedAdvisor::new())).await;

        let err = service.strategies("nobody", None).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { suggestion: Some(_), .. }));
        assert_eq!(cache.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_strategies_are_cached_per_budget() {
        let advisor = Arc::new(CountingAdvisor::default());
        let (service, _, _) = service_with(advisor.clone()).await;

        let first = service.strategies("u1", Some(1000.0)).await.unwrap();
        let second = service.strategies("u1", Some(1000.0)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);

        service.strategies("u1", None).await.unwrap();
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_drops_profile_derived_panels() {
        let advisor = Arc::new(CountingAdvisor::default());
        let (service, repository, _) = service_with(advisor.clone()).await;

        service.strategies("u1", None).await.unwrap();
        service.content_suggestions("u1", 3).await.unwrap();
        service.analyze_sentiment("u1", &["great".to_string()], None).await.unwrap();

        repository.upsert_profile("u1", profile_request("retail")).await;
        assert_eq!(service.invalidate("u1").await, 2);

        let strategies = service.strategies("u1", None).await.unwrap();
        assert_eq!(strategies[0].title, "Flash sale weekends");

        service.analyze_sentiment("u1", &["great".to_string()], None).await.unwrap();
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_sentiment_cached_per_user_and_content() {
        let advisor = Arc::new(CountingAdvisor::default());
        let (service, _, cache) = service_with(advisor.clone()).await;
        let slow = vec!["slow".to_string()];

        service.analyze_sentiment("u1", &slow, Some("survey-1")).await.unwrap();
        service.analyze_sentiment("u1", &slow, Some("survey-1")).await.unwrap();
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
        let key = keys::sentiment_analysis(&keys::scoped_sentiment_id("u1", Some("survey-1"), &slow));
        assert!(cache.exists(&key).await);

        let report = service
            .analyze_sentiment("u2", &["great coffee".to_string()], Some("survey-1"))
            .await
            .unwrap();
        assert_eq!(report.entries[0].text, "great coffee");
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_advisor_failure_propagates_and_caches_nothing() {
        let (service, _, cache) = service_with(Arc::new(FailingAdvisor)).await;

        let err = service.strategies("u1", None).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        let err = service.content_suggestions("u1", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("empty body")));

        assert_eq!(cache.stats().writes, 0);
        assert!(!cache.exists(&keys::marketing_strategies("u1", None)).await);
    }
}
