/// One row of the built-in sample dataset.
pub struct SampleAsset {
    pub id: &'static str,
    pub rank: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    pub price_usd: f64,
    pub change_percent_24h: f64,
    pub supply: f64,
    pub market_cap_usd: f64,
}

pub struct DemoResources {
    pub assets: &'static [SampleAsset],
}

pub struct DemoConfig {
    pub resources: DemoResources,
}

const fn sample(
    id: &'static str,
    rank: u32,
    symbol: &'static str,
    name: &'static str,
    price_usd: f64,
    change_percent_24h: f64,
    supply: f64,
    market_cap_usd: f64,
) -> SampleAsset {
    SampleAsset {
        id,
        rank,
        symbol,
        name,
        price_usd,
        change_percent_24h,
        supply,
        market_cap_usd,
    }
}

pub const DEMO: DemoConfig = DemoConfig {
    resources: DemoResources {
        assets: &[
            sample("bitcoin", 1, "BTC", "Bitcoin", 43250.50, 2.45, 19_000_000.0, 821_757_500_000.0),
            sample("ethereum", 2, "ETH", "Ethereum", 2280.75, -1.23, 120_000_000.0, 273_690_000_000.0),
            sample("tether", 3, "USDT", "Tether", 1.00, 0.01, 91_000_000_000.0, 91_000_000_000.0),
            sample("binance-coin", 4, "BNB", "BNB", 315.20, 3.67, 166_801_148.0, 52_567_561_648.0),
            sample("solana", 5, "SOL", "Solana", 98.45, 5.12, 411_000_000.0, 40_462_950_000.0),
            sample("ripple", 6, "XRP", "XRP", 0.52, -0.89, 99_988_120_490.0, 51_993_822_655.0),
            sample("usd-coin", 7, "USDC", "USD Coin", 1.00, 0.00, 25_000_000_000.0, 25_000_000_000.0),
            sample("cardano", 8, "ADA", "Cardano", 0.48, 1.87, 35_000_000_000.0, 16_800_000_000.0),
            sample("dogecoin", 9, "DOGE", "Dogecoin", 0.085, 4.23, 142_000_000_000.0, 12_070_000_000.0),
            sample("avalanche", 10, "AVAX", "Avalanche", 37.20, 2.90, 350_000_000.0, 13_020_000_000.0),
        ],
    },
};
