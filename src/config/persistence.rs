//! Local key-value persistence configuration

/// Configuration for the SQLite-backed key-value store
pub struct StoreConfig {
    /// Default database file (relative to the working directory)
    pub db_path: &'static str,
    /// Table holding every key-value pair
    pub table: &'static str,
    /// Pool size. One writer is plenty at this scale.
    pub max_connections: u32,
}

/// Fixed storage keys
pub struct KeyConfig {
    /// Prefix namespacing cached API responses (`cache_<url>`)
    pub cache_prefix: &'static str,
    /// Key of the ordered favorites list
    pub favorites: &'static str,
}

/// The Master Persistence Configuration
pub struct PersistenceConfig {
    pub store: StoreConfig,
    pub keys: KeyConfig,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    store: StoreConfig {
        db_path: "coin_watch.sqlite",
        table: "kv",
        max_connections: 1,
    },
    keys: KeyConfig {
        cache_prefix: "cache_",
        favorites: "favorites",
    },
};

/// Storage key for a cached response of `url`.
/// Example: "cache_https://pro-api.coingecko.com/api/v3/coins/bitcoin"
pub fn cache_key(url: &str) -> String {
    format!("{}{}", PERSISTENCE.keys.cache_prefix, url)
}
