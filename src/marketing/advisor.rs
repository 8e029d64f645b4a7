//! Advice generation
//!
//! `AdviceGenerator` is the seam between the marketing service and whatever
//! produces the advice. `RuleBasedAdvisor` is the bundled implementation: it
//! derives strategies and content ideas from the business profile and scores
//! sentiment against a small lexicon. Its output depends only on its inputs.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::marketing::models::{
    BudgetTier, ContentSuggestion, FeedbackSentiment, MarketingStrategy, SentimentLabel,
    SentimentReport,
};
use crate::models::BusinessProfile;

// == Advisor Error ==
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("advice provider unavailable: {0}")]
    Unavailable(String),

    #[error("advice provider returned an unusable response: {0}")]
    InvalidResponse(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

// == Advice Generator Trait ==
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Strategies that fit `budget`, or every strategy when it is `None`.
    async fn strategies(
        &self,
        profile: &BusinessProfile,
        budget: Option<f64>,
    ) -> Result<Vec<MarketingStrategy>, AdvisorError>;

    /// Exactly `count` content ideas.
    async fn content_suggestions(
        &self,
        profile: &BusinessProfile,
        count: u32,
    ) -> Result<Vec<ContentSuggestion>, AdvisorError>;

    async fn analyze_sentiment(&self, feedback: &[String]) -> Result<SentimentReport, AdvisorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sector {
    Food,
    Retail,
    Services,
    General,
}

impl Sector {
    fn of(industry: &str) -> Self {
        let industry = industry.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| industry.contains(w));

        if has(&["restaurant", "food", "cafe", "café", "bakery", "coffee", "bar"]) {
            Sector::Food
        } else if has(&["retail", "shop", "store", "boutique", "ecommerce", "e-commerce"]) {
            Sector::Retail
        } else if has(&["service", "consult", "agency", "salon", "clinic", "repair"]) {
            Sector::Services
        } else {
            Sector::General
        }
    }

    fn topics(self) -> &'static [&'static str] {
        match self {
            Sector::Food => &[
                "Behind the scenes in the kitchen",
                "Dish of the week",
                "Meet the team",
                "Customer favorite",
                "Ingredient spotlight",
            ],
            Sector::Retail => &[
                "New arrivals",
                "Styling tips",
                "Customer spotlight",
                "Limited-time offer",
                "Product care guide",
            ],
            Sector::Services => &[
                "Client success story",
                "Common questions answered",
                "Quick tip",
                "Meet the expert",
                "Before and after",
            ],
            Sector::General => &[
                "Our story",
                "Customer spotlight",
                "Tips from the team",
                "Behind the scenes",
                "Special offer",
            ],
        }
    }
}

struct StrategyTemplate {
    sector: Option<Sector>,
    tier: BudgetTier,
    title: &'static str,
    channel: &'static str,
    pitch: &'static str,
    cost: f64,
    outcome: &'static str,
}

const STRATEGIES: &[StrategyTemplate] = &[
    StrategyTemplate {
        sector: Some(Sector::Food),
        tier: BudgetTier::Low,
        title: "Seasonal menu spotlight",
        channel: "Instagram",
        pitch: "Photograph one seasonal dish a week and post it with the story behind it",
        cost: 150.0,
        outcome: "More weekday visits from followers",
    },
    StrategyTemplate {
        sector: Some(Sector::Retail),
        tier: BudgetTier::Medium,
        title: "Flash sale weekends",
        channel: "Social media",
        pitch: "Run a monthly 48-hour sale announced only to followers and subscribers",
        cost: 1000.0,
        outcome: "Short sales spikes and a growing subscriber list",
    },
    StrategyTemplate {
        sector: Some(Sector::Services),
        tier: BudgetTier::Low,
        title: "Free consultation offer",
        channel: "Website",
        pitch: "Offer a free 20-minute consultation booked directly from your website",
        cost: 0.0,
        outcome: "A steady flow of qualified leads",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::Low,
        title: "Google Business Profile",
        channel: "Local search",
        pitch: "Complete your profile, add photos and answer every review",
        cost: 0.0,
        outcome: "Better visibility in local search results",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::Low,
        title: "Email newsletter",
        channel: "Email",
        pitch: "Send a short monthly newsletter with news and one exclusive offer",
        cost: 50.0,
        outcome: "Higher repeat purchase rate",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::Low,
        title: "Customer referral program",
        channel: "Word of mouth",
        pitch: "Reward existing customers for every new customer they bring",
        cost: 100.0,
        outcome: "Low-cost customer acquisition",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::Medium,
        title: "Local partnerships",
        channel: "Partnerships",
        pitch: "Team up with neighbouring businesses for joint promotions",
        cost: 800.0,
        outcome: "Access to an established local audience",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::Medium,
        title: "Targeted social ads",
        channel: "Social media",
        pitch: "Run small ad sets targeted by location and interests, and keep the best performers",
        cost: 1500.0,
        outcome: "Measurable reach in your target audience",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::High,
        title: "Influencer collaborations",
        channel: "Influencers",
        pitch: "Partner with two or three creators whose followers match your audience",
        cost: 6000.0,
        outcome: "Brand awareness with a trusted voice",
    },
    StrategyTemplate {
        sector: None,
        tier: BudgetTier::High,
        title: "Multi-channel campaign",
        channel: "Paid media",
        pitch: "Coordinate search, social and display ads around one seasonal message",
        cost: 8000.0,
        outcome: "Broad reach with consistent messaging",
    },
];

const PLATFORMS: &[(&str, &str)] = &[
    ("Instagram", "photo post"),
    ("Facebook", "post"),
    ("LinkedIn", "article"),
    ("Email", "newsletter"),
];

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "best", "clean", "delicious", "excellent", "fast", "fresh", "friendly",
    "good", "great", "happy", "helpful", "love", "loved", "nice", "perfect", "quality",
    "recommend", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "broken", "cold", "dirty", "disappointed", "disappointing", "expensive",
    "hate", "horrible", "late", "overpriced", "poor", "rude", "slow", "terrible", "unhelpful",
    "worst", "wrong",
];

const NEGATORS: &[&str] = &["not", "no", "never"];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn audience(profile: &BusinessProfile) -> &str {
    profile
        .target_audience
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("your customers")
}

fn hashtag(text: &str) -> String {
    let mut tag = String::from("#");
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            tag.extend(first.to_uppercase());
            tag.push_str(chars.as_str());
        }
    }
    tag
}

/// Score of one feedback entry in `[-1, 1]`.
///
/// A negator flips the polarity of the word right after it.
fn score_entry(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let (mut positive, mut negative) = (0u32, 0u32);
    for (i, word) in words.iter().enumerate() {
        let polarity = if POSITIVE_WORDS.contains(word) {
            1
        } else if NEGATIVE_WORDS.contains(word) {
            -1
        } else {
            continue;
        };
        let negated = i > 0 && NEGATORS.contains(&words[i - 1]);
        if (polarity > 0) != negated {
            positive += 1;
        } else {
            negative += 1;
        }
    }

    let total = positive + negative;
    if total == 0 {
        0.0
    } else {
        round2((f64::from(positive) - f64::from(negative)) / f64::from(total))
    }
}

// == Rule Based Advisor ==
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAdvisor;

impl RuleBasedAdvisor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AdviceGenerator for RuleBasedAdvisor {
    async fn strategies(
        &self,
        profile: &BusinessProfile,
        budget: Option<f64>,
    ) -> Result<Vec<MarketingStrategy>, AdvisorError> {
        let sector = Sector::of(&profile.industry);
        let audience = audience(profile);

        let strategies = STRATEGIES
            .iter()
            .filter(|s| s.sector.is_none() || s.sector == Some(sector))
            .filter(|s| match budget {
                Some(budget) => s.tier <= BudgetTier::for_budget(budget) && s.cost <= budget,
                None => true,
            })
            .map(|s| MarketingStrategy {
                title: s.title.to_string(),
                channel: s.channel.to_string(),
                description: format!("{} to reach {} of {}.", s.pitch, audience, profile.business_name),
                tier: s.tier,
                estimated_monthly_cost: s.cost,
                expected_outcome: s.outcome.to_string(),
            })
            .collect();

        Ok(strategies)
    }

    async fn content_suggestions(
        &self,
        profile: &BusinessProfile,
        count: u32,
    ) -> Result<Vec<ContentSuggestion>, AdvisorError> {
        let topics = Sector::of(&profile.industry).topics();
        let audience = audience(profile);

        let suggestions = (0..count as usize)
            .map(|i| {
                let topic = topics[i % topics.len()];
                let (platform, content_type) = PLATFORMS[i % PLATFORMS.len()];
                let round = i / topics.len();
                let headline = if round == 0 {
                    format!("{topic} at {}", profile.business_name)
                } else {
                    format!("{topic} at {} (part {})", profile.business_name, round + 1)
                };

                ContentSuggestion {
                    platform: platform.to_string(),
                    content_type: content_type.to_string(),
                    headline,
                    body: format!(
                        "Share a {content_type} about {} for {audience}. Keep it short and end with a call to action.",
                        topic.to_lowercase()
                    ),
                    hashtags: vec![
                        hashtag(&profile.business_name),
                        hashtag(&profile.industry),
                        hashtag(topic),
                    ],
                }
            })
            .collect();

        Ok(suggestions)
    }

    async fn analyze_sentiment(&self, feedback: &[String]) -> Result<SentimentReport, AdvisorError> {
        let entries: Vec<FeedbackSentiment> = feedback
            .iter()
            .map(|text| {
                let score = score_entry(text);
                FeedbackSentiment {
                    text: text.clone(),
                    score,
                    label: SentimentLabel::for_score(score),
                }
            })
            .collect();

        let count = |label| entries.iter().filter(|e| e.label == label).count();
        let score = if entries.is_empty() {
            0.0
        } else {
            round2(entries.iter().map(|e| e.score).sum::<f64>() / entries.len() as f64)
        };

        Ok(SentimentReport {
            overall: SentimentLabel::for_score(score),
            score,
            positive: count(SentimentLabel::Positive),
            neutral: count(SentimentLabel::Neutral),
            negative: count(SentimentLabel::Negative),
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(industry: &str) -> BusinessProfile {
        BusinessProfile {
            user_id: "u1".to_string(),
            business_name: "Corner Cafe".to_string(),
            industry: industry.to_string(),
            description: None,
            target_audience: Some("young professionals".to_string()),
            location: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sector_detection() {
        assert_eq!(Sector::of("Restaurant & Bar"), Sector::Food);
        assert_eq!(Sector::of("Online Boutique"), Sector::Retail);
        assert_eq!(Sector::of("IT Consulting"), Sector::Services);
        assert_eq!(Sector::of("Manufacturing"), Sector::General);
    }

    #[test]
    fn test_hashtag() {
        assert_eq!(hashtag("corner cafe"), "#CornerCafe");
        assert_eq!(hashtag("Dish of the week"), "#DishOfTheWeek");
    }

    #[tokio::test]
    async fn test_strategies_respect_budget() {
        let advisor = RuleBasedAdvisor::new();

        let low = advisor.strategies(&profile("cafe"), Some(100.0)).await.unwrap();
        let titles: Vec<&str> = low.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Google Business Profile", "Email newsletter", "Customer referral program"]
        );
        assert!(low.iter().all(|s| s.estimated_monthly_cost <= 100.0));
    }

    #[tokio::test]
    async fn test_strategies_without_budget_include_every_tier() {
        let advisor = RuleBasedAdvisor::new();

        let all = advisor.strategies(&profile("cafe"), None).await.unwrap();

        assert_eq!(all[0].title, "Seasonal menu spotlight");
        assert!(all.iter().any(|s| s.tier == BudgetTier::High));
        assert!(all.iter().all(|s| s.title != "Flash sale weekends"));
        assert!(all[0].description.contains("young professionals"));
        assert!(all[0].description.contains("Corner Cafe"));
    }

    #[tokio::test]
    async fn test_content_suggestions_count_and_cycling() {
        let advisor = RuleBasedAdvisor::new();

        let ideas = advisor.content_suggestions(&profile("retail"), 7).await.unwrap();

        assert_eq!(ideas.len(), 7);
        assert_eq!(ideas[0].platform, "Instagram");
        assert_eq!(ideas[4].platform, "Instagram");
        assert_eq!(ideas[0].headline, "New arrivals at Corner Cafe");
        assert_eq!(ideas[5].headline, "New arrivals at Corner Cafe (part 2)");
        assert_eq!(ideas[0].hashtags[0], "#CornerCafe");
    }

    #[tokio::test]
    async fn test_content_suggestions_are_deterministic() {
        let advisor = RuleBasedAdvisor::new();
        let a = advisor.content_suggestions(&profile("salon"), 3).await.unwrap();
        let b = advisor.content_suggestions(&profile("salon"), 3).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_entry() {
        assert_eq!(score_entry("Great service and friendly staff!"), 1.0);
        assert_eq!(score_entry("Slow delivery, not good"), -1.0);
        assert_eq!(score_entry("Good food but slow service"), 0.0);
        assert_eq!(score_entry("It was okay"), 0.0);
        assert_eq!(score_entry("Never bad"), 1.0);
    }

    #[tokio::test]
    async fn test_analyze_sentiment_aggregates() {
        let advisor = RuleBasedAdvisor::new();
        let feedback = vec![
            "Loved it, excellent coffee".to_string(),
            "Rude staff".to_string(),
            "Fresh and delicious".to_string(),
            "Came on a Tuesday".to_string(),
        ];

        let report = advisor.analyze_sentiment(&feedback).await.unwrap();

        assert_eq!(report.positive, 2);
        assert_eq!(report.negative, 1);
        assert_eq!(report.neutral, 1);
        assert_eq!(report.score, 0.25);
        assert_eq!(report.overall, SentimentLabel::Positive);
        assert_eq!(report.entries.len(), 4);
    }

    #[test]
    fn test_advisor_error_maps_to_upstream() {
        let err: AppError = AdvisorError::Unavailable("timeout".to_string()).into();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("timeout")));
    }
}
