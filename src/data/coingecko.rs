//! CoinGecko-compatible market API client
//!
//! Three GET endpoints, all routed through the [`TtlCache`]:
//! - `/coins/markets` top list (ranked by market cap)
//! - `/coins/markets?ids=..` batched quotes for the watchlist
//! - `/coins/{id}` single-asset detail

use {
    super::{MarketDataProvider, MarketError, Result, TtlCache},
    crate::{config::COINGECKO, domain::Asset},
    async_trait::async_trait,
    reqwest::{Client, Url},
    serde::Deserialize,
    serde_json::Value,
    std::time::Duration,
};

/// One row of `/coins/markets`. Every numeric field may be null upstream.
#[derive(Debug, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl From<CoinMarket> for Asset {
    fn from(c: CoinMarket) -> Self {
        Self {
            id: c.id,
            rank: c.market_cap_rank.unwrap_or(0),
            symbol: c.symbol.unwrap_or_default().to_uppercase(),
            name: c.name.unwrap_or_default(),
            price_usd: c.current_price.unwrap_or(0.0),
            change_percent_24h: c.price_change_percentage_24h.unwrap_or(0.0),
            supply: c.circulating_supply.unwrap_or(0.0),
            market_cap_usd: c.market_cap.unwrap_or(0.0),
        }
    }
}

/// Per-currency figure; only USD is used.
#[derive(Debug, Default, Deserialize)]
pub struct UsdValue {
    #[serde(default)]
    pub usd: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: UsdValue,
    #[serde(default)]
    pub market_cap: UsdValue,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

/// `/coins/{id}` response (the subset we read).
#[derive(Debug, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub market_data: CoinMarketData,
}

impl From<CoinDetail> for Asset {
    fn from(c: CoinDetail) -> Self {
        Self {
            id: c.id,
            rank: c.market_cap_rank.unwrap_or(0),
            symbol: c.symbol.unwrap_or_default().to_uppercase(),
            name: c.name.unwrap_or_default(),
            price_usd: c.market_data.current_price.usd.unwrap_or(0.0),
            change_percent_24h: c.market_data.price_change_percentage_24h.unwrap_or(0.0),
            supply: c.market_data.circulating_supply.unwrap_or(0.0),
            market_cap_usd: c.market_data.market_cap.usd.unwrap_or(0.0),
        }
    }
}

pub struct CoinGeckoProvider {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    cache: TtlCache,
    ttl: Duration,
}

impl CoinGeckoProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        cache: TtlCache,
        ttl: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(COINGECKO.client.timeout_ms))
            .user_agent(COINGECKO.client.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            cache,
            ttl,
        })
    }

    pub fn top_assets_url(&self, limit: usize) -> Result<Url> {
        let per_page = limit.to_string();
        self.url(
            COINGECKO.endpoints.markets_path,
            &[
                ("vs_currency", COINGECKO.endpoints.vs_currency),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        )
    }

    pub fn prices_url(&self, ids: &[String]) -> Result<Url> {
        let joined = ids.join(",");
        self.url(
            COINGECKO.endpoints.markets_path,
            &[
                ("vs_currency", COINGECKO.endpoints.vs_currency),
                ("ids", joined.as_str()),
                ("order", "market_cap_desc"),
                ("sparkline", "false"),
            ],
        )
    }

    /// `id` goes in as one escaped path segment, so `?`, `#` or `/` in it
    /// cannot change the endpoint or the cache key.
    pub fn asset_url(&self, id: &str) -> Result<Url> {
        let mut url = self.url(COINGECKO.endpoints.coin_path, &[])?;
        url.path_segments_mut()
            .map_err(|_| MarketError::InvalidUrl(format!("{} cannot take a path", self.base_url)))?
            .push(id);
        url.set_query(Some(COINGECKO.endpoints.coin_detail_query));
        Ok(url)
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| MarketError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Cached GET of a JSON document.
    async fn get_json(&self, url: Url) -> Result<Value> {
        let key = url.to_string();
        self.cache
            .get(&key, self.ttl, || self.fetch_json(url))
            .await
    }

    async fn fetch_json(&self, url: Url) -> Result<Value> {
        let mut request = self
            .http
            .get(url.clone())
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header(COINGECKO.api_key_header, key);
        }

        let response = request.send().await?;
        Self::handle_response(url, response).await
    }

    async fn handle_response(url: Url, response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.json().await.map_err(MarketError::from)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_top_assets(&self, limit: usize) -> Result<Vec<Asset>> {
        let payload = self.get_json(self.top_assets_url(limit)?).await?;
        decode_markets(payload)
    }

    async fn fetch_prices(&self, ids: &[String]) -> Result<Vec<Asset>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let payload = self.get_json(self.prices_url(ids)?).await?;
        decode_markets(payload)
    }

    async fn fetch_asset(&self, id: &str) -> Result<Asset> {
        let payload = self.get_json(self.asset_url(id)?).await?;
        let detail: CoinDetail = serde_json::from_value(payload)?;
        Ok(detail.into())
    }

    fn source_name(&self) -> &'static str {
        "CoinGecko API"
    }
}

pub fn decode_markets(payload: Value) -> Result<Vec<Asset>> {
    let coins: Vec<CoinMarket> = serde_json::from_value(payload)?;
    Ok(coins.into_iter().map(Asset::from).collect())
}
