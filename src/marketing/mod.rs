//! Marketing Module
//!
//! Strategy recommendations, content ideas and feedback sentiment, served
//! through the cache.

mod advisor;
mod models;
mod service;

pub use advisor::{AdviceGenerator, AdvisorError, RuleBasedAdvisor};
pub use models::{
    BudgetTier, ContentSuggestion, FeedbackSentiment, MarketingStrategy, SentimentLabel,
    SentimentReport,
};
pub use service::MarketingService;
