use {
    super::{MarketDataProvider, MarketError, Result},
    crate::{
        config::{DEMO, WATCHLIST},
        domain::Asset,
    },
    async_trait::async_trait,
    rand::{Rng, SeedableRng, rngs::StdRng},
    std::sync::Mutex,
};

/// Serves the built-in sample dataset. Poll quotes get a small random
/// jitter so a chart in sample mode still moves.
pub struct SampleProvider {
    rng: Mutex<StdRng>,
    jitter: f64,
}

impl SampleProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            jitter: WATCHLIST.sample_jitter,
        }
    }

    /// Deterministic jitter, for tests and reproducible demos.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            jitter: WATCHLIST.sample_jitter,
        }
    }

    /// The whole dataset, rank order, no jitter.
    pub fn assets() -> Vec<Asset> {
        DEMO.resources.assets.iter().map(Asset::from).collect()
    }

    /// Dataset lookup without going through the provider interface.
    pub fn find(id: &str) -> Option<Asset> {
        DEMO.resources
            .assets
            .iter()
            .find(|s| s.id == id)
            .map(Asset::from)
    }

    fn jittered(&self, price: f64) -> f64 {
        if self.jitter <= 0.0 {
            return price;
        }
        match self.rng.lock() {
            Ok(mut rng) => price * (1.0 + rng.gen_range(-self.jitter..=self.jitter)),
            Err(_) => price,
        }
    }
}

impl Default for SampleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for SampleProvider {
    async fn fetch_top_assets(&self, limit: usize) -> Result<Vec<Asset>> {
        Ok(Self::assets().into_iter().take(limit).collect())
    }

    async fn fetch_prices(&self, ids: &[String]) -> Result<Vec<Asset>> {
        let quotes = Self::assets()
            .into_iter()
            .filter(|a| ids.contains(&a.id))
            .map(|mut a| {
                a.price_usd = self.jittered(a.price_usd);
                a
            })
            .collect();
        Ok(quotes)
    }

    async fn fetch_asset(&self, id: &str) -> Result<Asset> {
        Self::find(id).ok_or_else(|| MarketError::NotFound(id.to_string()))
    }

    fn source_name(&self) -> &'static str {
        "sample data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prices_cover_only_requested_ids_within_one_percent() {
        let provider = SampleProvider::with_seed(7);
        let ids = vec!["ethereum".to_string(), "bitcoin".to_string(), "nope".to_string()];

        for _ in 0..50 {
            let quotes = provider.fetch_prices(&ids).await.unwrap();
            let got: Vec<_> = quotes.iter().map(|a| a.id.as_str()).collect();
            assert_eq!(got, vec!["bitcoin", "ethereum"]);

            for quote in &quotes {
                let base = SampleProvider::find(&quote.id).unwrap().price_usd;
                assert!((quote.price_usd / base - 1.0).abs() <= 0.01 + 1e-12);
            }
        }
    }

    #[tokio::test]
    async fn top_assets_respect_limit_and_are_not_jittered() {
        let provider = SampleProvider::with_seed(1);
        let top = provider.fetch_top_assets(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].id, "bitcoin");
        assert_eq!(top[0].price_usd, 43250.50);
    }

    #[tokio::test]
    async fn unknown_asset_is_not_found() {
        let provider = SampleProvider::with_seed(1);
        assert!(matches!(
            provider.fetch_asset("pepe").await,
            Err(MarketError::NotFound(id)) if id == "pepe"
        ));
    }
}
