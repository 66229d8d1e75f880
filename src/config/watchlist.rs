//! Watchlist limits, poll cadence and degradation thresholds.
use std::time::Duration;

pub struct WatchlistConfig {
    /// Hard cap on favorites. Adding beyond this requires a manual replacement.
    pub max_favorites: usize,
    /// Samples kept per price series (oldest dropped first).
    pub series_capacity: usize,
    /// Live poller period. Fixed regardless of failure streak.
    pub poll_period: Duration,
    /// Freshness window for cached API responses.
    pub cache_ttl: Duration,
    /// Consecutive failures that switch the session to sample data.
    pub failure_threshold: u32,
    /// Max relative jitter applied to sample prices on each poll (0.01 = ±1%).
    pub sample_jitter: f64,
}

pub const WATCHLIST: WatchlistConfig = WatchlistConfig {
    max_favorites: 5,
    series_capacity: 120,
    poll_period: Duration::from_secs(30),
    cache_ttl: Duration::from_secs(30),
    failure_threshold: 3,
    sample_jitter: 0.01,
};
