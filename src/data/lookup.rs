use {
    super::{MarketDataProvider, SampleProvider},
    crate::domain::Asset,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Loaded,
    Remote(&'static str),
    Sample,
}

impl std::fmt::Display for LookupSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LookupSource::Loaded => write!(f, "loaded list"),
            LookupSource::Remote(name) => write!(f, "{}", name),
            LookupSource::Sample => write!(f, "sample data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetLookup {
    Found { asset: Asset, source: LookupSource },
    NotFound(String),
}

/// Detail lookup for one asset. Checks the already-loaded list before any
/// network call; on a failed call falls back to the sample dataset. In
/// sample mode only the sample dataset is consulted. Never retries.
pub async fn lookup_asset(
    id: &str,
    loaded: &[Asset],
    provider: &dyn MarketDataProvider,
    sample_mode: bool,
) -> AssetLookup {
    if sample_mode {
        return match SampleProvider::find(id) {
            Some(asset) => AssetLookup::Found {
                asset,
                source: LookupSource::Sample,
            },
            None => AssetLookup::NotFound(id.to_string()),
        };
    }

    if let Some(asset) = loaded.iter().find(|a| a.id == id) {
        return AssetLookup::Found {
            asset: asset.clone(),
            source: LookupSource::Loaded,
        };
    }

    match provider.fetch_asset(id).await {
        Ok(asset) => AssetLookup::Found {
            asset,
            source: LookupSource::Remote(provider.source_name()),
        },
        Err(e) => {
            log::warn!("Detail fetch for {} failed: {}", id, e);
            match SampleProvider::find(id) {
                Some(asset) => AssetLookup::Found {
                    asset,
                    source: LookupSource::Sample,
                },
                None => AssetLookup::NotFound(id.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MarketError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Every call fails and is counted.
    #[derive(Default)]
    struct Offline {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for Offline {
        async fn fetch_top_assets(&self, _limit: usize) -> Result<Vec<Asset>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MarketError::Transport("offline".into()))
        }
        async fn fetch_prices(&self, _ids: &[String]) -> Result<Vec<Asset>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MarketError::Transport("offline".into()))
        }
        async fn fetch_asset(&self, _id: &str) -> Result<Asset> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MarketError::Transport("offline".into()))
        }
        fn source_name(&self) -> &'static str {
            "offline"
        }
    }

    #[tokio::test]
    async fn loaded_list_wins_without_a_network_call() {
        let provider = Offline::default();
        let mut custom = SampleProvider::find("solana").unwrap();
        custom.price_usd = 1.0;

        let found = lookup_asset("solana", &[custom.clone()], &provider, false).await;
        assert_eq!(
            found,
            AssetLookup::Found { asset: custom, source: LookupSource::Loaded }
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_sample_then_not_found() {
        let provider = Offline::default();

        let fallback = lookup_asset("cardano", &[], &provider, false).await;
        assert!(matches!(
            fallback,
            AssetLookup::Found { source: LookupSource::Sample, .. }
        ));

        let missing = lookup_asset("pepe", &[], &provider, false).await;
        assert_eq!(missing, AssetLookup::NotFound("pepe".into()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sample_mode_never_calls_the_provider() {
        let provider = Offline::default();
        let found = lookup_asset("bitcoin", &[], &provider, true).await;
        assert!(matches!(found, AssetLookup::Found { source: LookupSource::Sample, .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn source_labels() {
        assert_eq!(LookupSource::Remote("CoinGecko API").to_string(), "CoinGecko API");
        assert_eq!(LookupSource::Loaded.to_string(), "loaded list");
    }
}
