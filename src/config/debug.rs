//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Log every cache hit/miss with the key involved.
    pub log_cache: bool,

    /// Log each poller tick and the ids requested.
    pub log_poll_ticks: bool,

    /// Log every sample appended to a series.
    pub log_series_updates: bool,

    /// Log key-value store reads and writes.
    pub log_storage: bool,

    pub log_favorites: bool,
}

pub const DF: LogFlags = LogFlags {
    log_favorites: true,

    log_cache: false,
    log_poll_ticks: false,
    log_series_updates: false,
    log_storage: false,
};
