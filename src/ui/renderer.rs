use crate::{
    data::AssetLookup,
    domain::{Asset, FavoriteRef},
    engine::PollStatus,
    models::{FeedMode, SeriesSet, Watchlist},
};

/// Turns watchlist state into something visible. The controller calls it
/// after every state change; implementations never call back.
pub trait Renderer {
    /// The (possibly filtered) asset list, with favorite membership.
    fn assets(&mut self, assets: &[&Asset], favorites: &Watchlist);

    fn favorites(&mut self, favorites: &Watchlist);

    fn chart(&mut self, series: &SeriesSet, mode: FeedMode);

    fn status(&mut self, mode: FeedMode, status: &PollStatus);

    /// The list is full; show the current favorites so one can be swapped for `candidate`.
    fn replacement_prompt(&mut self, candidate: &FavoriteRef, current: &[FavoriteRef]);

    fn lookup(&mut self, result: &AssetLookup);

    /// Free text (help, prompts).
    fn message(&mut self, text: &str);
}
