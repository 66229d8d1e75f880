use {
    super::Renderer,
    crate::{
        data::AssetLookup,
        domain::{Asset, FavoriteRef},
        engine::PollStatus,
        models::{FeedMode, PriceSeries, SeriesSet, Watchlist},
        utils::{format_amount, format_clock_time, format_percent, format_price, hue_to_hsl},
    },
    std::io::{Stdout, Write},
    tabled::{Table, Tabled, settings::Style},
};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 40;

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "#")]
    rank: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price ($)")]
    price: String,
    #[tabled(rename = "24h")]
    change: String,
    #[tabled(rename = "Market Cap ($)")]
    market_cap: String,
    #[tabled(rename = "Watch")]
    watched: &'static str,
}

#[derive(Tabled)]
struct FavoriteRow {
    #[tabled(rename = "Slot")]
    slot: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Id")]
    id: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Samples")]
    samples: usize,
    #[tabled(rename = "Last ($)")]
    last: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Trend")]
    trend: String,
}

fn favorite_rows(items: &[FavoriteRef]) -> Vec<FavoriteRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, f)| FavoriteRow {
            slot: i + 1,
            name: f.name.clone(),
            symbol: f.symbol.clone(),
            id: f.id.clone(),
        })
        .collect()
}

/// Unicode block sparkline of the most recent samples.
pub fn sparkline(series: &PriceSeries) -> String {
    let prices: Vec<f64> = series.samples().map(|s| s.price).collect();
    let recent = &prices[prices.len().saturating_sub(SPARK_WIDTH)..];
    let Some((lo, hi)) = series.range() else {
        return String::new();
    };
    let span = hi - lo;
    recent
        .iter()
        .map(|p| {
            if span <= f64::EPSILON {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let level = ((p - lo) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Plain-text renderer: tables on a writer (stdout by default).
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Terminal output is best effort; a closed pipe must not take the watcher down
    fn line(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.out, "{}", text.as_ref());
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn assets(&mut self, assets: &[&Asset], favorites: &Watchlist) {
        if assets.is_empty() {
            self.line("No results.");
            return;
        }
        let rows: Vec<AssetRow> = assets
            .iter()
            .map(|a| AssetRow {
                rank: a.rank,
                name: a.name.clone(),
                symbol: a.symbol.clone(),
                price: format_price(a.price_usd),
                change: format!(
                    "{} {}",
                    if a.is_up() { '▲' } else { '▼' },
                    format_percent(a.change_percent_24h)
                ),
                market_cap: format_amount(a.market_cap_usd),
                watched: if favorites.contains(&a.id) { "★" } else { "" },
            })
            .collect();
        self.line(Table::new(rows).with(Style::rounded()).to_string());
    }

    fn favorites(&mut self, favorites: &Watchlist) {
        if favorites.is_empty() {
            self.line("Watchlist is empty.");
            return;
        }
        self.line(format!("Watchlist ({}/{})", favorites.len(), favorites.capacity()));
        self.line(
            Table::new(favorite_rows(favorites.items()))
                .with(Style::rounded())
                .to_string(),
        );
    }

    fn chart(&mut self, series: &SeriesSet, mode: FeedMode) {
        if series.is_empty() {
            self.line("No favorites to chart.");
            return;
        }
        let rows: Vec<SeriesRow> = series
            .iter()
            .map(|s| {
                let (low, high) = s
                    .range()
                    .map(|(lo, hi)| (format_price(lo), format_price(hi)))
                    .unwrap_or_else(|| ("-".into(), "-".into()));
                SeriesRow {
                    symbol: s.symbol.clone(),
                    color: hue_to_hsl(s.hue),
                    samples: s.len(),
                    last: s.latest().map_or_else(|| "-".into(), |l| format_price(l.price)),
                    low,
                    high,
                    trend: sparkline(s),
                }
            })
            .collect();
        self.line(format!("Live prices [{}]", mode));
        self.line(Table::new(rows).with(Style::rounded()).to_string());
    }

    fn status(&mut self, mode: FeedMode, status: &PollStatus) {
        let text = match status {
            PollStatus::Idle => "idle, no favorites".to_string(),
            PollStatus::Updating => "updating...".to_string(),
            PollStatus::Ok { at, updated } => {
                format!("updated {} ({} prices)", format_clock_time(*at), updated)
            }
            PollStatus::Error(reason) => format!("update failed: {}", reason),
        };
        self.line(format!("[{}] {}", mode, text));
    }

    fn replacement_prompt(&mut self, candidate: &FavoriteRef, current: &[FavoriteRef]) {
        self.line(format!(
            "Watchlist is full. Pick one to replace with {}:",
            candidate
        ));
        self.line(
            Table::new(favorite_rows(current))
                .with(Style::rounded())
                .to_string(),
        );
    }

    fn lookup(&mut self, result: &AssetLookup) {
        match result {
            AssetLookup::Found { asset, source } => {
                self.line(format!("{} ({})", asset.name, asset.symbol));
                self.line(format!("  Price:      ${}", format_price(asset.price_usd)));
                self.line(format!("  Market Cap: ${}", format_amount(asset.market_cap_usd)));
                self.line(format!("  Supply:     {}", format_amount(asset.supply)));
                self.line(format!("  24h:        {}", format_percent(asset.change_percent_24h)));
                self.line(format!("  Source:     {}", source));
            }
            AssetLookup::NotFound(id) => self.line(format!("No data found for {}", id)),
        }
    }

    fn message(&mut self, text: &str) {
        self.line(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::{LookupSource, SampleProvider}, models::SeriesSet};
    use chrono::{DateTime, Utc};

    fn render(f: impl FnOnce(&mut TerminalRenderer<Vec<u8>>)) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn asset_table_marks_favorites() {
        let assets = SampleProvider::assets();
        let refs: Vec<&Asset> = assets.iter().take(2).collect();
        let mut favorites = Watchlist::new(5);
        favorites.add(FavoriteRef::from(&assets[1]));

        let text = render(|r| r.assets(&refs, &favorites));
        let eth_line = text.lines().find(|l| l.contains("Ethereum")).unwrap();
        let btc_line = text.lines().find(|l| l.contains("Bitcoin")).unwrap();
        assert!(eth_line.contains('★'));
        assert!(!btc_line.contains('★'));
        assert!(btc_line.contains("43,250.5"));
    }

    #[test]
    fn sparkline_spans_low_to_high() {
        let fav = FavoriteRef { id: "a".into(), symbol: "A".into(), name: "A".into() };
        let mut set = SeriesSet::with_capacity(&[fav], 10);
        let at: DateTime<Utc> = DateTime::from_timestamp(0, 0).unwrap();
        let mut quote = SampleProvider::find("bitcoin").unwrap();
        quote.id = "a".into();
        for p in [1.0, 2.0, 3.0] {
            quote.price_usd = p;
            set.apply(std::slice::from_ref(&quote), at);
        }
        assert_eq!(sparkline(set.get("a").unwrap()), "▁▅█");
    }

    #[test]
    fn not_found_and_status_lines() {
        let text = render(|r| {
            r.lookup(&AssetLookup::NotFound("pepe".into()));
            r.status(FeedMode::Sample, &PollStatus::Error("HTTP status 500".into()));
            r.status(FeedMode::Live, &PollStatus::Idle);
        });
        assert!(text.contains("No data found for pepe"));
        assert!(text.contains("[sample] update failed: HTTP status 500"));
        assert!(text.contains("[live] idle"));
    }

    #[test]
    fn lookup_shows_source() {
        let asset = SampleProvider::find("cardano").unwrap();
        let text = render(|r| r.lookup(&AssetLookup::Found { asset, source: LookupSource::Sample }));
        assert!(text.contains("Cardano (ADA)"));
        assert!(text.contains("Source:     sample data"));
    }
}
