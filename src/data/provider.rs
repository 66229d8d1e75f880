use {
    super::Result,
    crate::domain::Asset,
    async_trait::async_trait,
};

/// Abstract interface for fetching market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Top `limit` assets by market cap, rank order.
    async fn fetch_top_assets(&self, limit: usize) -> Result<Vec<Asset>>;

    /// Current quotes for exactly `ids`, in one batched request.
    /// Unknown ids are simply absent from the result.
    async fn fetch_prices(&self, ids: &[String]) -> Result<Vec<Asset>>;

    /// Full record for one asset.
    async fn fetch_asset(&self, id: &str) -> Result<Asset>;

    /// Short label for where the numbers came from (shown next to details).
    fn source_name(&self) -> &'static str;
}
