use {
    chrono::{TimeZone, Utc},
    coin_watch::{
        MarketDataProvider, MarketError,
        config::cache_key,
        data::{CacheEntry, CoinGeckoProvider, KeyValueStore, SqliteKvStore, TtlCache},
        utils::{Clock, ManualClock},
    },
    serde_json::json,
    std::{sync::Arc, time::Duration},
};

const TTL: Duration = Duration::from_secs(30);

// Nothing listens on the discard port, so any real request fails fast
const DEAD_API: &str = "http://127.0.0.1:9/api/v3";

#[tokio::test]
async fn cached_quotes_are_served_until_the_ttl_then_kept_on_failed_refresh() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::in_memory().await.unwrap());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap()));
    let cache = TtlCache::new(store.clone(), clock.clone());
    let provider = CoinGeckoProvider::new(DEAD_API, Some("key".into()), cache.clone(), TTL).unwrap();

    let ids = vec!["bitcoin".to_string()];
    let url = provider.prices_url(&ids).unwrap().to_string();
    let seeded = CacheEntry {
        data: json!([{
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "market_cap_rank": 1, "current_price": 61000.0
        }]),
        created_at: clock.now(),
    };
    store
        .set(&cache_key(&url), &serde_json::to_string(&seeded).unwrap())
        .await
        .unwrap();

    // Fresh: no network needed
    clock.advance(Duration::from_secs(29));
    let quotes = provider.fetch_prices(&ids).await.unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].price_usd, 61000.0);
    assert_eq!(quotes[0].symbol, "BTC");

    // Expired: the refetch fails and the old entry survives untouched
    clock.advance(Duration::from_secs(1));
    let err = provider.fetch_prices(&ids).await.unwrap_err();
    assert!(matches!(err, MarketError::Transport(_)), "got {err:?}");
    assert_eq!(cache.stored(&url).await, Some(seeded));
}

#[tokio::test]
async fn empty_id_list_makes_no_request() {
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKvStore::in_memory().await.unwrap());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let provider = CoinGeckoProvider::new(DEAD_API, None, TtlCache::new(store, clock), TTL).unwrap();

    assert!(provider.fetch_prices(&[]).await.unwrap().is_empty());
}
