mod cache;
mod coingecko;
mod error;
mod lookup;
mod provider;
mod sample;
mod storage;

pub use {
    cache::{CacheEntry, TtlCache},
    coingecko::{CoinDetail, CoinGeckoProvider, CoinMarket, decode_markets},
    error::{MarketError, Result},
    lookup::{AssetLookup, LookupSource, lookup_asset},
    provider::MarketDataProvider,
    sample::SampleProvider,
    storage::{KeyValueStore, MemoryKvStore, SqliteKvStore},
};
