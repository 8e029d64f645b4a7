//! Marketing payload types.

use serde::{Deserialize, Serialize};

/// Spending band a strategy is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    Medium,
    High,
}

impl BudgetTier {
    /// Monthly budgets under 500 are low, under 5000 medium.
    pub fn for_budget(budget: f64) -> Self {
        if budget < 500.0 {
            BudgetTier::Low
        } else if budget < 5000.0 {
            BudgetTier::Medium
        } else {
            BudgetTier::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingStrategy {
    pub title: String,
    pub channel: String,
    pub description: String,
    pub tier: BudgetTier,
    pub estimated_monthly_cost: f64,
    pub expected_outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSuggestion {
    pub platform: String,
    pub content_type: String,
    pub headline: String,
    pub body: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Scores beyond ±0.2 lean one way; anything in between is neutral.
    pub fn for_score(score: f64) -> Self {
        if score > 0.2 {
            SentimentLabel::Positive
        } else if score < -0.2 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Sentiment of one feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSentiment {
    pub text: String,
    pub score: f64,
    pub label: SentimentLabel,
}

/// Aggregate sentiment over a feedback set. Scores range from -1 to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub overall: SentimentLabel,
    pub score: f64,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub entries: Vec<FeedbackSentiment>,
}
