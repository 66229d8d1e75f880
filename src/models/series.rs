use {
    crate::{
        config::{DF, WATCHLIST},
        domain::{Asset, FavoriteRef},
        utils::symbol_hue,
    },
    chrono::{DateTime, Utc},
    std::collections::VecDeque,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub at: DateTime<Utc>,
    pub price: f64,
}

/// Trailing price history for one favorite, capped FIFO.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub id: String,
    pub symbol: String,
    pub hue: u16,
    samples: VecDeque<PriceSample>,
    capacity: usize,
}

impl PriceSeries {
    pub fn new(favorite: &FavoriteRef, capacity: usize) -> Self {
        Self {
            id: favorite.id.clone(),
            symbol: favorite.symbol.clone(),
            hue: symbol_hue(&favorite.symbol),
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, dropping the oldest past capacity.
    /// Non-finite prices are refused (returns false).
    pub fn push(&mut self, at: DateTime<Utc>, price: f64) -> bool {
        if !price.is_finite() {
            return false;
        }
        self.samples.push_back(PriceSample { at, price });
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        true
    }

    pub fn samples(&self) -> impl Iterator<Item = &PriceSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (min, max) over the window, for chart scaling.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, s| match acc {
            None => Some((s.price, s.price)),
            Some((lo, hi)) => Some((lo.min(s.price), hi.max(s.price))),
        })
    }
}

/// One series per current favorite, in favorites order. Rebuilt from scratch
/// whenever the favorites change.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    series: Vec<PriceSeries>,
}

impl SeriesSet {
    pub fn rebuild(favorites: &[FavoriteRef]) -> Self {
        Self::with_capacity(favorites, WATCHLIST.series_capacity)
    }

    pub fn with_capacity(favorites: &[FavoriteRef], capacity: usize) -> Self {
        Self {
            series: favorites
                .iter()
                .map(|f| PriceSeries::new(f, capacity))
                .collect(),
        }
    }

    /// Records one quote per asset that still has a series. Quotes for ids
    /// with no series (favorite removed while the request was in flight) are
    /// ignored. Returns how many samples were appended.
    pub fn apply(&mut self, quotes: &[Asset], at: DateTime<Utc>) -> usize {
        let mut updated = 0;
        for quote in quotes {
            let Some(series) = self.series.iter_mut().find(|s| s.id == quote.id) else {
                continue;
            };
            if series.push(at, quote.price_usd) {
                updated += 1;

                #[cfg(debug_assertions)]
                if DF.log_series_updates {
                    log::debug!("[series] {} -> {:.6} ({} samples)", series.symbol, quote.price_usd, series.len());
                }
            }
        }
        updated
    }

    pub fn get(&self, id: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        self.series.iter().map(|s| s.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
