//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Secret used when `JWT_SECRET` is unset. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "bizdash-dev-secret";

/// Longest accepted trend window: ten years.
pub const MAX_TREND_WINDOW_DAYS: i64 = 3650;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Redis connection URL; the in-memory store is used without one
    pub redis_url: Option<String>,
    /// HMAC secret for bearer tokens
    pub jwt_secret: String,
    /// Length of one dashboard trend window in days
    pub trend_window_days: i64,
    /// Default stock level at or below which a product counts as low
    pub low_stock_threshold: u32,
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Bounds a trend window length to `1..=MAX_TREND_WINDOW_DAYS`.
pub fn clamp_trend_window_days(days: i64) -> i64 {
    days.clamp(1, MAX_TREND_WINDOW_DAYS)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_ENTRIES` - Maximum in-memory entries (default: 10000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 30)
    /// - `REDIS_URL` - Redis backend, e.g. `redis://127.0.0.1:6379` (default: unset)
    /// - `JWT_SECRET` - Token signing secret (default: development secret)
    /// - `TREND_WINDOW_DAYS` - Trend window length, 1 to 3650 (default: 30)
    /// - `LOW_STOCK_THRESHOLD` - Default low-stock level (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            max_entries: parse_var("MAX_ENTRIES", defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|secret| !secret.is_empty())
                .unwrap_or(defaults.jwt_secret),
            trend_window_days: clamp_trend_window_days(parse_var(
                "TREND_WINDOW_DAYS",
                defaults.trend_window_days,
            )),
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD", defaults.low_stock_threshold),
        }
    }

    /// Whether tokens are signed with the built-in development secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_entries: 10_000,
            cleanup_interval: 30,
            redis_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            trend_window_days: 30,
            low_stock_threshold: 10,
        }
    }
}
