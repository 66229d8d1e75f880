/// HTTP client defaults for the market API.
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub user_agent: &'static str,
}

/// REST endpoints (relative to `base_url`) and their query shapes.
pub struct Endpoints {
    pub markets_path: &'static str,
    pub coin_path: &'static str,
    pub vs_currency: &'static str,
    pub coin_detail_query: &'static str,
}

pub struct CoinGeckoConfig {
    pub base_url: &'static str,
    pub api_key_header: &'static str,
    pub api_key_env: &'static str,
    pub top_assets_limit: usize,
    pub endpoints: Endpoints,
    pub client: ClientDefaults,
}

pub const COINGECKO: CoinGeckoConfig = CoinGeckoConfig {
    base_url: "https://pro-api.coingecko.com/api/v3",
    api_key_header: "x-cg-pro-api-key",
    api_key_env: "COINGECKO_API_KEY",
    top_assets_limit: 100,
    endpoints: Endpoints {
        markets_path: "/coins/markets",
        coin_path: "/coins",
        vs_currency: "usd",
        coin_detail_query: "localization=false&tickers=false&community_data=false&developer_data=false",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        user_agent: concat!("coin-watch/", env!("CARGO_PKG_VERSION")),
    },
};
