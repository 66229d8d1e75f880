use {
    crate::{
        Cli,
        config::WATCHLIST,
        data::{
            CoinGeckoProvider, KeyValueStore, MarketDataProvider, MemoryKvStore, SampleProvider,
            SqliteKvStore, TtlCache,
        },
        models::DegradationPolicy,
        utils::{Clock, SystemClock},
    },
    anyhow::{Context, Result},
    std::sync::Arc,
};

/// Long-lived collaborators shared by every subcommand.
pub struct Services {
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub live: Arc<dyn MarketDataProvider>,
    pub sample: Arc<dyn MarketDataProvider>,
    /// `--sample`: never touch the network
    pub sample_only: bool,
}

impl Services {
    pub async fn connect(cli: &Cli) -> Result<Self> {
        // 1. Storage. A broken database file should not stop the watcher.
        let store: Arc<dyn KeyValueStore> = match SqliteKvStore::new(&cli.db).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!(
                    "Could not open {} ({}); favorites and cache will not persist",
                    cli.db,
                    e
                );
                Arc::new(MemoryKvStore::new())
            }
        };

        // 2. Clock + cache
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = TtlCache::new(Arc::clone(&store), Arc::clone(&clock));

        // 3. Providers
        let live = CoinGeckoProvider::new(
            cli.base_url.as_str(),
            cli.api_key.clone(),
            cache,
            WATCHLIST.cache_ttl,
        )
        .context("Failed to build HTTP client")?;

        if cli.api_key.is_none() && !cli.sample {
            log::warn!("No API key given; requests may be rejected");
        }

        Ok(Self {
            store,
            clock,
            live: Arc::new(live),
            sample: Arc::new(SampleProvider::new()),
            sample_only: cli.sample,
        })
    }

    /// Source for one-shot commands.
    pub fn provider(&self) -> Arc<dyn MarketDataProvider> {
        if self.sample_only {
            Arc::clone(&self.sample)
        } else {
            Arc::clone(&self.live)
        }
    }

    pub fn policy(&self) -> DegradationPolicy {
        if self.sample_only {
            DegradationPolicy::sample_only()
        } else {
            DegradationPolicy::default()
        }
    }
}
