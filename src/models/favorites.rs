//! The favorites watchlist: at most `WATCHLIST.max_favorites` assets, in
//! insertion order, no duplicate ids.
//!
//! [`Watchlist`] is the pure ordered set. [`FavoritesStore`] wraps it with
//! persistence: every mutation writes the full list to the key-value store
//! before it is committed in memory.

use {
    crate::{
        config::{DF, PERSISTENCE, WATCHLIST},
        data::{KeyValueStore, Result},
        domain::{Asset, FavoriteRef},
    },
    std::sync::Arc,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// List is full. The caller must offer a replacement choice.
    Rejected { capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// List is full; these are the candidates the user may replace.
    NeedsReplacement { current: Vec<FavoriteRef> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchlist {
    items: Vec<FavoriteRef>,
    capacity: usize,
}

impl Watchlist {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Builds a list from untrusted input (e.g. storage): later duplicates
    /// are dropped, then anything past `capacity`.
    pub fn from_items(items: Vec<FavoriteRef>, capacity: usize) -> Self {
        let mut list = Self::new(capacity);
        for item in items {
            if list.is_full() {
                break;
            }
            if !list.contains(&item.id) {
                list.items.push(item);
            }
        }
        list
    }

    pub fn items(&self) -> &[FavoriteRef] {
        &self.items
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|f| f.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|f| f.id == id)
    }

    pub fn add(&mut self, item: FavoriteRef) -> AddOutcome {
        if self.contains(&item.id) {
            return AddOutcome::AlreadyPresent;
        }
        if self.is_full() {
            return AddOutcome::Rejected {
                capacity: self.capacity,
            };
        }
        self.items.push(item);
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|f| f.id != id);
        self.items.len() != before
    }

    /// Drops `old_id` and appends `item` in one step. No-op (false) when
    /// `old_id` is absent or `item` already sits in another slot.
    pub fn replace(&mut self, old_id: &str, item: FavoriteRef) -> bool {
        if !self.contains(old_id) || (item.id != old_id && self.contains(&item.id)) {
            return false;
        }
        self.items.retain(|f| f.id != old_id);
        self.items.push(item);
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new(WATCHLIST.max_favorites)
    }
}

pub struct FavoritesStore {
    list: Watchlist,
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    /// Restores the persisted list. Missing or unreadable data starts empty.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(PERSISTENCE.keys.favorites).await {
            Ok(Some(raw)) => serde_json::from_str::<Vec<FavoriteRef>>(&raw).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable favorites list: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Could not read favorites: {}", e);
                Vec::new()
            }
        };

        Self {
            list: Watchlist::from_items(items, WATCHLIST.max_favorites),
            store,
        }
    }

    pub fn list(&self) -> &Watchlist {
        &self.list
    }

    pub fn contains(&self, id: &str) -> bool {
        self.list.contains(id)
    }

    pub async fn add(&mut self, asset: &Asset) -> Result<AddOutcome> {
        let mut next = self.list.clone();
        let outcome = next.add(FavoriteRef::from(asset));
        if outcome == AddOutcome::Added {
            self.commit(next).await?;
        }
        Ok(outcome)
    }

    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        let mut next = self.list.clone();
        let removed = next.remove(id);
        if removed {
            self.commit(next).await?;
        }
        Ok(removed)
    }

    pub async fn replace(&mut self, old_id: &str, asset: &Asset) -> Result<bool> {
        let mut next = self.list.clone();
        let replaced = next.replace(old_id, FavoriteRef::from(asset));
        if replaced {
            self.commit(next).await?;
        }
        Ok(replaced)
    }

    pub async fn clear(&mut self) -> Result<bool> {
        let mut next = self.list.clone();
        let cleared = next.clear();
        if cleared {
            self.commit(next).await?;
        }
        Ok(cleared)
    }

    /// One-button favorite: removes if present, adds if there is room,
    /// otherwise asks for a replacement.
    pub async fn toggle(&mut self, asset: &Asset) -> Result<ToggleOutcome> {
        if self.contains(&asset.id) {
            self.remove(&asset.id).await?;
            return Ok(ToggleOutcome::Removed);
        }
        match self.add(asset).await? {
            AddOutcome::Rejected { .. } => Ok(ToggleOutcome::NeedsReplacement {
                current: self.list.items().to_vec(),
            }),
            AddOutcome::Added | AddOutcome::AlreadyPresent => Ok(ToggleOutcome::Added),
        }
    }

    async fn commit(&mut self, next: Watchlist) -> Result<()> {
        let encoded = serde_json::to_string(next.items())?;
        self.store.set(PERSISTENCE.keys.favorites, &encoded).await?;

        #[cfg(debug_assertions)]
        if DF.log_favorites {
            log::info!("Favorites now [{}]", next.ids().join(", "));
        }

        self.list = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MarketError, MemoryKvStore};
    use async_trait::async_trait;

    fn fav(id: &str) -> FavoriteRef {
        FavoriteRef {
            id: id.to_string(),
            symbol: id.to_uppercase(),
            name: id.to_string(),
        }
    }

    fn asset(id: &str) -> Asset {
        Asset {
            id: id.to_string(),
            rank: 1,
            symbol: id.to_uppercase(),
            name: id.to_string(),
            price_usd: 1.0,
            change_percent_24h: 0.0,
            supply: 0.0,
            market_cap_usd: 0.0,
        }
    }

    fn full_list() -> Watchlist {
        let mut list = Watchlist::new(5);
        for id in ["a", "b", "c", "d", "e"] {
            assert_eq!(list.add(fav(id)), AddOutcome::Added);
        }
        list
    }

    #[test]
    fn sixth_add_is_rejected_for_capacity() {
        let mut list = full_list();
        assert_eq!(list.add(fav("f")), AddOutcome::Rejected { capacity: 5 });
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn replace_at_capacity_keeps_order_of_the_rest() {
        let mut list = full_list();
        assert!(list.replace("c", fav("f")));
        assert_eq!(list.ids(), vec!["a", "b", "d", "e", "f"]);
    }

    #[test]
    fn replace_refuses_missing_old_or_duplicate_new() {
        let mut list = full_list();
        assert!(!list.replace("zz", fav("f")));
        assert!(!list.replace("a", fav("b")));
        assert_eq!(list, full_list());
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut list = Watchlist::new(5);
        list.add(fav("a"));
        assert_eq!(list.add(fav("a")), AddOutcome::AlreadyPresent);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn invariants_hold_for_mixed_sequences() {
        // Cheap deterministic walk over many add/remove/replace interleavings
        let ids = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let mut list = Watchlist::new(5);
        let mut seed: u32 = 17;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let pick = ids[(seed >> 8) as usize % ids.len()];
            let other = ids[(seed >> 16) as usize % ids.len()];
            match seed % 3 {
                0 => {
                    list.add(fav(pick));
                }
                1 => {
                    list.remove(pick);
                }
                _ => {
                    list.replace(other, fav(pick));
                }
            }

            assert!(list.len() <= 5);
            let mut seen = list.ids();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), list.len());
        }
    }

    #[test]
    fn from_items_dedupes_and_truncates() {
        let items = ["a", "a", "b", "c", "d", "e", "f"].map(fav).to_vec();
        let list = Watchlist::from_items(items, 5);
        assert_eq!(list.ids(), vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn mutations_persist_and_reload_in_order() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let mut favorites = FavoritesStore::load(store.clone()).await;
        assert!(favorites.list().is_empty());

        favorites.add(&asset("bitcoin")).await.unwrap();
        favorites.add(&asset("ethereum")).await.unwrap();
        favorites.add(&asset("solana")).await.unwrap();
        assert!(favorites.remove("bitcoin").await.unwrap());
        assert!(!favorites.remove("bitcoin").await.unwrap());

        let reloaded = FavoritesStore::load(store).await;
        assert_eq!(reloaded.list().ids(), vec!["ethereum", "solana"]);
        assert_eq!(reloaded.list().items()[0].symbol, "ETHEREUM");
    }

    #[tokio::test]
    async fn toggle_cycles_through_add_remove_and_replacement() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let mut favorites = FavoritesStore::load(store).await;

        assert_eq!(favorites.toggle(&asset("a")).await.unwrap(), ToggleOutcome::Added);
        assert_eq!(favorites.toggle(&asset("a")).await.unwrap(), ToggleOutcome::Removed);

        for id in ["a", "b", "c", "d", "e"] {
            favorites.toggle(&asset(id)).await.unwrap();
        }
        match favorites.toggle(&asset("f")).await.unwrap() {
            ToggleOutcome::NeedsReplacement { current } => assert_eq!(current.len(), 5),
            other => panic!("expected replacement prompt, got {:?}", other),
        }
        assert!(!favorites.contains("f"));
    }

    #[tokio::test]
    async fn unreadable_persisted_list_starts_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        store.set(PERSISTENCE.keys.favorites, "not json").await.unwrap();
        let favorites = FavoritesStore::load(store).await;
        assert!(favorites.list().is_empty());
    }

    struct ReadOnly;

    #[async_trait]
    impl KeyValueStore for ReadOnly {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(MarketError::Storage("read-only".into()))
        }
    }

    #[tokio::test]
    async fn failed_persist_leaves_memory_untouched() {
        let mut favorites = FavoritesStore::load(Arc::new(ReadOnly)).await;
        let result = favorites.add(&asset("bitcoin")).await;
        assert!(matches!(result, Err(MarketError::Storage(_))));
        assert!(favorites.list().is_empty());
    }
}
