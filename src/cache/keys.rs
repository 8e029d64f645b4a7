//! Cache key generators for consistent key naming.
//!
//! Every builder is pure: identical inputs always give identical keys, which is
//! what makes cache hits possible across requests and processes.

use sha2::{Digest, Sha256};

use crate::cache::pattern::escape_glob;

/// Separator between key segments. User ids must not contain it.
pub const KEY_SEPARATOR: char = ':';

const DASHBOARD: &str = "dashboard";
const MARKETING: &str = "marketing";

/// Key for a user's full dashboard payload.
#[must_use]
pub fn dashboard_data(user_id: &str) -> String {
    format!("{DASHBOARD}:{user_id}")
}

/// Key for a user's key metrics.
#[must_use]
pub fn dashboard_metrics(user_id: &str) -> String {
    format!("{DASHBOARD}:metrics:{user_id}")
}

/// Key for a user's trends over a set of metrics.
///
/// Metric names are sorted before joining, so the caller's ordering does not
/// matter.
#[must_use]
pub fn dashboard_trends<S: AsRef<str>>(user_id: &str, metrics: &[S]) -> String {
    let mut names: Vec<&str> = metrics.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();
    format!("{DASHBOARD}:trends:{user_id}:{}", names.join(","))
}

/// Key for marketing strategies at a given budget, or `all` without one.
#[must_use]
pub fn marketing_strategies(user_id: &str, budget: Option<f64>) -> String {
    match budget {
        Some(amount) => format!("{MARKETING}:strategies:{user_id}:{amount}"),
        None => format!("{MARKETING}:strategies:{user_id}:all"),
    }
}

/// Key for a batch of `count` content suggestions.
#[must_use]
pub fn content_suggestions(user_id: &str, count: u32) -> String {
    format!("{MARKETING}:content:{user_id}:{count}")
}

/// Key for the sentiment analysis of one feedback set.
#[must_use]
pub fn sentiment_analysis(feedback_id: &str) -> String {
    format!("{MARKETING}:sentiment:{feedback_id}")
}

/// Stable identifier for a feedback set: SHA-256 over its entries.
#[must_use]
pub fn sentiment_id<S: AsRef<str>>(feedback: &[S]) -> String {
    let mut hasher = Sha256::new();
    for entry in feedback {
        hasher.update(entry.as_ref().as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Identifier for one user's feedback set.
///
/// The caller's label only narrows the identity: two users, or two different
/// feedback sets under one label, never share an identifier.
#[must_use]
pub fn scoped_sentiment_id<S: AsRef<str>>(user_id: &str, label: Option<&str>, feedback: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0u8]);
    if let Some(label) = label {
        hasher.update([1u8]);
        hasher.update(label.as_bytes());
    }
    hasher.update([0u8]);
    hasher.update(sentiment_id(feedback).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Patterns covering every dashboard entry of one user.
#[must_use]
pub fn dashboard_invalidation_patterns(user_id: &str) -> [String; 3] {
    let user = escape_glob(user_id);
    [
        format!("{DASHBOARD}:{user}"),
        format!("{DASHBOARD}:*:{user}"),
        format!("{DASHBOARD}:*:{user}:*"),
    ]
}

/// Pattern covering every per-user marketing entry of one user.
#[must_use]
pub fn marketing_invalidation_pattern(user_id: &str) -> String {
    format!("{MARKETING}:*:{}:*", escape_glob(user_id))
}
