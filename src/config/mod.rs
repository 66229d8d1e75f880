//! Configuration module for the watchlist application.

// Can all be private now because we have a public re-export.
mod coingecko;
mod debug;
mod demo;
mod persistence;
mod watchlist;

// Re-export commonly used items
pub use coingecko::{COINGECKO, CoinGeckoConfig};
pub use debug::DF;
pub use demo::{DEMO, SampleAsset};
pub use persistence::{PERSISTENCE, cache_key};
pub use watchlist::{WATCHLIST, WatchlistConfig};
