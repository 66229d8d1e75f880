mod degradation;
mod favorites;
mod series;

pub use {
    degradation::{DegradationPolicy, FailureOutcome, FeedMode},
    favorites::{AddOutcome, FavoritesStore, ToggleOutcome, Watchlist},
    series::{PriceSample, PriceSeries, SeriesSet},
};
