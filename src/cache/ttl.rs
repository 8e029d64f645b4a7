//! Time-to-live policy per feature area.
//!
//! Cheap, volatile numbers expire quickly; generated advice is expensive and
//! stable, so it is kept longer.

use std::time::Duration;

/// Dashboard payloads, metrics and trends (5 minutes).
pub const DASHBOARD: Duration = Duration::from_secs(5 * 60);

/// Marketing strategies (1 hour).
pub const MARKETING_STRATEGIES: Duration = Duration::from_secs(60 * 60);

/// Sentiment analysis of a feedback set (24 hours).
pub const SENTIMENT_ANALYSIS: Duration = Duration::from_secs(24 * 60 * 60);

/// Content suggestions (1 hour).
pub const CONTENT_SUGGESTIONS: Duration = Duration::from_secs(60 * 60);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_values() {
        assert_eq!(DASHBOARD.as_secs(), 300);
        assert_eq!(MARKETING_STRATEGIES.as_secs(), 3_600);
        assert_eq!(SENTIMENT_ANALYSIS.as_secs(), 86_400);
        assert_eq!(CONTENT_SUGGESTIONS.as_secs(), 3_600);
    }
}
