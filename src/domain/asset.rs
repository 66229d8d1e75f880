use {
    crate::config::SampleAsset,
    serde::{Deserialize, Serialize},
};

/// A market asset as returned by one fetch. Never mutated, only replaced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    pub rank: u32,
    pub symbol: String,
    pub name: String,
    pub price_usd: f64,
    pub change_percent_24h: f64,
    pub supply: f64,
    pub market_cap_usd: f64,
}

impl Asset {
    /// True when the 24h change is flat or up (drives the green/red badge).
    pub fn is_up(&self) -> bool {
        self.change_percent_24h >= 0.0
    }

    /// Case-insensitive match against name, symbol or id.
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}

impl From<&SampleAsset> for Asset {
    fn from(s: &SampleAsset) -> Self {
        Self {
            id: s.id.to_string(),
            rank: s.rank,
            symbol: s.symbol.to_string(),
            name: s.name.to_string(),
            price_usd: s.price_usd,
            change_percent_24h: s.change_percent_24h,
            supply: s.supply,
            market_cap_usd: s.market_cap_usd,
        }
    }
}

/// Search over the loaded list. A blank query returns everything.
pub fn filter_assets<'a>(assets: &'a [Asset], query: &str) -> Vec<&'a Asset> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return assets.iter().collect();
    }
    assets.iter().filter(|a| a.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEMO;

    fn demo_assets() -> Vec<Asset> {
        DEMO.resources.assets.iter().map(Asset::from).collect()
    }

    #[test]
    fn blank_query_returns_everything() {
        let assets = demo_assets();
        assert_eq!(filter_assets(&assets, "   ").len(), assets.len());
    }

    #[test]
    fn query_matches_name_symbol_or_id() {
        let assets = demo_assets();

        let by_symbol: Vec<_> = filter_assets(&assets, "doge").iter().map(|a| a.id.clone()).collect();
        assert_eq!(by_symbol, vec!["dogecoin"]);

        let by_id: Vec<_> = filter_assets(&assets, "BINANCE").iter().map(|a| a.id.clone()).collect();
        assert_eq!(by_id, vec!["binance-coin"]);

        // "usd" hits the USDC name and the USDT/USDC symbols
        let usd: Vec<_> = filter_assets(&assets, "usd").iter().map(|a| a.symbol.clone()).collect();
        assert_eq!(usd, vec!["USDT", "USDC"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter_assets(&demo_assets(), "zzz").is_empty());
    }
}
