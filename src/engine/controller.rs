use {
    super::{Command, EngineEvent, LivePoller, PollStatus, PollerState},
    crate::{
        config::{COINGECKO, WATCHLIST},
        data::{AssetLookup, KeyValueStore, MarketDataProvider, MarketError, SampleProvider, lookup_asset},
        domain::{Asset, FavoriteRef, filter_assets},
        models::{
            AddOutcome, DegradationPolicy, FailureOutcome, FavoritesStore, FeedMode, SeriesSet,
            ToggleOutcome, Watchlist,
        },
        ui::{Notice, Notifier, Renderer},
        utils::Clock,
    },
    std::{sync::Arc, time::Duration},
    tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

/// Collaborators and knobs for one watch session.
pub struct WatchSetup {
    pub live: Arc<dyn MarketDataProvider>,
    pub sample: Arc<dyn MarketDataProvider>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub policy: DegradationPolicy,
    pub poll_period: Duration,
    pub asset_limit: usize,
}

impl WatchSetup {
    /// Defaults from `WATCHLIST` / `COINGECKO`; the sample source is the
    /// built-in dataset.
    pub fn new(live: Arc<dyn MarketDataProvider>, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            live,
            sample: Arc::new(SampleProvider::new()),
            store,
            clock,
            policy: DegradationPolicy::default(),
            poll_period: WATCHLIST.poll_period,
            asset_limit: COINGECKO.top_assets_limit,
        }
    }
}

/// Owns all mutable session state and reacts to user commands and
/// background events one at a time.
pub struct WatchController {
    /// Remote market API
    live: Arc<dyn MarketDataProvider>,
    /// Built-in dataset, used once the policy has degraded
    sample: Arc<dyn MarketDataProvider>,

    favorites: FavoritesStore,
    series: SeriesSet,
    policy: DegradationPolicy,
    poller: LivePoller,
    status: PollStatus,

    /// Last successfully loaded asset list (or the sample dataset)
    assets: Vec<Asset>,
    asset_limit: usize,

    /// Asset waiting for a slot after a capacity rejection
    pending_replacement: Option<Asset>,

    clock: Arc<dyn Clock>,
    renderer: Box<dyn Renderer>,
    notifier: Box<dyn Notifier>,

    events_tx: UnboundedSender<EngineEvent>,
    events_rx: UnboundedReceiver<EngineEvent>,
}

impl WatchController {
    pub async fn new(setup: WatchSetup, renderer: Box<dyn Renderer>, notifier: Box<dyn Notifier>) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let favorites = FavoritesStore::load(setup.store).await;
        let series = SeriesSet::rebuild(favorites.list().items());

        Self {
            live: setup.live,
            sample: setup.sample,
            favorites,
            series,
            policy: setup.policy,
            poller: LivePoller::new(setup.poll_period),
            status: PollStatus::Idle,
            assets: Vec::new(),
            asset_limit: setup.asset_limit,
            pending_replacement: None,
            clock: setup.clock,
            renderer,
            notifier,
            events_tx,
            events_rx,
        }
    }

    // --- Accessors ---

    pub fn favorites(&self) -> &Watchlist {
        self.favorites.list()
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    pub fn policy(&self) -> &DegradationPolicy {
        &self.policy
    }

    pub fn mode(&self) -> FeedMode {
        self.policy.mode()
    }

    pub fn status(&self) -> &PollStatus {
        &self.status
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    pub fn poller_generation(&self) -> u64 {
        self.poller.generation()
    }

    pub fn pending_replacement(&self) -> Option<&Asset> {
        self.pending_replacement.as_ref()
    }

    fn active_provider(&self) -> Arc<dyn MarketDataProvider> {
        match self.policy.mode() {
            FeedMode::Live => Arc::clone(&self.live),
            FeedMode::Sample => Arc::clone(&self.sample),
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notifier.notify(notice);
    }

    // --- Lifecycle ---

    /// Initial load, first render and the first poller build.
    pub async fn start(&mut self) {
        self.load_assets().await;
        self.renderer.favorites(self.favorites.list());
        self.rebuild_watch();
    }

    /// Fetches the asset list. On failure the sample dataset is shown in its
    /// place; the mode is left alone.
    pub async fn load_assets(&mut self) {
        let provider = self.active_provider();
        match provider.fetch_top_assets(self.asset_limit).await {
            Ok(assets) => {
                if self.policy.mode() == FeedMode::Live {
                    self.policy.record_success();
                }
                self.notify(Notice::success(format!(
                    "Loaded {} assets from {}",
                    assets.len(),
                    provider.source_name()
                )));
                self.assets = assets;
            }
            Err(e) => {
                // Only price polls count toward degradation
                log::warn!("Asset list fetch failed: {}", e);
                self.notify(Notice::warning(format!(
                    "Showing sample data: could not load assets ({})",
                    e
                )));
                self.assets = SampleProvider::assets();
            }
        }

        let everything: Vec<&Asset> = self.assets.iter().collect();
        self.renderer.assets(&everything, self.favorites.list());
    }

    /// Rebuilds the series set from the favorites and restarts the poller
    /// for exactly those ids. Called after every favorites mutation.
    pub fn rebuild_watch(&mut self) {
        self.series = SeriesSet::rebuild(self.favorites.list().items());
        let state = self
            .poller
            .restart(self.favorites.list().ids(), self.events_tx.clone());

        if state == PollerState::Idle {
            self.status = PollStatus::Idle;
        }
        self.renderer.chart(&self.series, self.policy.mode());
        self.renderer.status(self.policy.mode(), &self.status);
    }

    /// Stops the poller. Further ticks are never delivered.
    pub fn shutdown(&mut self) {
        self.poller.stop();
    }

    // --- Events ---

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Tick { generation, ids } => {
                if generation != self.poller.generation() {
                    log::debug!("Dropping tick from retired poller gen {}", generation);
                    return;
                }
                let mode = self.policy.mode();
                self.dispatch_poll(mode, ids);
            }
            EngineEvent::Prices {
                source,
                requested,
                result,
            } => self.apply_prices(source, requested, result),
        }
    }

    /// Starts one batched price request on its own task. The result comes
    /// back as an [`EngineEvent::Prices`].
    fn dispatch_poll(&mut self, source: FeedMode, ids: Vec<String>) {
        if ids.is_empty() {
            return;
        }
        let provider = match source {
            FeedMode::Live => Arc::clone(&self.live),
            FeedMode::Sample => Arc::clone(&self.sample),
        };
        let events = self.events_tx.clone();

        self.status = PollStatus::Updating;
        tokio::spawn(async move {
            let result = provider.fetch_prices(&ids).await;
            let _ = events.send(EngineEvent::Prices {
                source,
                requested: ids,
                result,
            });
        });
    }

    fn apply_prices(&mut self, source: FeedMode, requested: Vec<String>, result: Result<Vec<Asset>, MarketError>) {
        // Watchlist emptied while the request was in flight: stay Idle
        if self.series.is_empty() {
            log::debug!("Dropping {} price response, nothing is watched", source);
            return;
        }

        match result {
            Ok(quotes) => {
                if source == FeedMode::Live {
                    self.policy.record_success();
                }
                // Quotes for ids removed meanwhile find no series and are skipped
                let at = self.clock.now();
                let updated = self.series.apply(&quotes, at);
                if updated < requested.len() {
                    log::debug!(
                        "Applied {} of {} requested prices ({})",
                        updated,
                        requested.len(),
                        source
                    );
                }
                self.status = PollStatus::Ok { at, updated };
                self.renderer.chart(&self.series, self.policy.mode());
            }
            Err(e) => {
                log::warn!("Price update failed ({}): {}", source, e);
                match self.policy.record_failure() {
                    FailureOutcome::SwitchedToSample => {
                        self.notify(Notice::warning(format!(
                            "Switched to sample mode after {} failed updates",
                            self.policy.consecutive_failures()
                        )));
                        // Retry right away instead of waiting for the next tick
                        let ids = self.series.ids();
                        self.dispatch_poll(FeedMode::Sample, ids);
                        if self.status != PollStatus::Updating {
                            self.status = PollStatus::Error(e.to_string());
                        }
                    }
                    FailureOutcome::Counted { .. } => {
                        self.status = PollStatus::Error(e.to_string());
                        self.notify(Notice::danger(format!("Price update failed: {}", e)));
                    }
                }
            }
        }
        self.renderer.status(self.policy.mode(), &self.status);
    }

    /// Waits for the next background event and handles it. False once the
    /// channel is closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    // --- Commands ---

    /// Runs the session until `Quit` or until the command source closes.
    pub async fn run(&mut self, mut commands: UnboundedReceiver<Command>) {
        self.start().await;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
        }

        self.shutdown();
    }

    pub async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Add(id) => self.add(&id).await,
            Command::Remove(id) => self.remove(&id).await,
            Command::Toggle(id) => self.toggle(&id).await,
            Command::Replace { old, new } => self.replace(&old, new.as_deref()).await,
            Command::Clear => self.clear().await,
            Command::List => self.renderer.favorites(self.favorites.list()),
            Command::Assets => self.search(""),
            Command::Search(query) => self.search(&query),
            Command::Info(id) => self.info(&id).await,
            Command::Chart => {
                self.renderer.chart(&self.series, self.policy.mode());
                self.renderer.status(self.policy.mode(), &self.status);
            }
            Command::Help => self.renderer.message(Command::HELP),
            Command::Quit => self.shutdown(),
        }
    }

    /// Finds an asset by id: loaded list first, then the active source, then
    /// the sample dataset.
    async fn resolve(&mut self, id: &str) -> Option<Asset> {
        let provider = self.active_provider();
        match lookup_asset(id, &self.assets, provider.as_ref(), self.policy.is_sample()).await {
            AssetLookup::Found { asset, .. } => Some(asset),
            AssetLookup::NotFound(id) => {
                self.notify(Notice::warning(format!("Unknown asset '{}'", id)));
                None
            }
        }
    }

    pub async fn add(&mut self, id: &str) {
        let Some(asset) = self.resolve(id).await else {
            return;
        };

        match self.favorites.add(&asset).await {
            Ok(AddOutcome::Added) => {
                self.notify(Notice::success(format!("Added {} to favorites", asset.name)));
                self.after_mutation();
            }
            Ok(AddOutcome::AlreadyPresent) => {
                self.notify(Notice::info(format!("{} is already a favorite", asset.name)));
            }
            Ok(AddOutcome::Rejected { capacity }) => self.prompt_replacement(asset, capacity),
            Err(e) => self.storage_failed(e),
        }
    }

    pub async fn remove(&mut self, id: &str) {
        let name = self
            .favorites
            .list()
            .items()
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.clone());

        match self.favorites.remove(id).await {
            Ok(true) => {
                let name = name.unwrap_or_else(|| id.to_string());
                self.notify(Notice::success(format!("Removed {} from favorites", name)));
                self.after_mutation();
            }
            Ok(false) => self.notify(Notice::info(format!("{} is not a favorite", id))),
            Err(e) => self.storage_failed(e),
        }
    }

    pub async fn toggle(&mut self, id: &str) {
        let Some(asset) = self.resolve(id).await else {
            return;
        };

        match self.favorites.toggle(&asset).await {
            Ok(ToggleOutcome::Added) => {
                self.notify(Notice::success(format!("Added {} to favorites", asset.name)));
                self.after_mutation();
            }
            Ok(ToggleOutcome::Removed) => {
                self.notify(Notice::success(format!("Removed {} from favorites", asset.name)));
                self.after_mutation();
            }
            Ok(ToggleOutcome::NeedsReplacement { .. }) => {
                let capacity = self.favorites.list().capacity();
                self.prompt_replacement(asset, capacity);
            }
            Err(e) => self.storage_failed(e),
        }
    }

    /// Swaps `old_id` for `new_id`, or for the asset left pending by the last
    /// capacity rejection when `new_id` is omitted.
    pub async fn replace(&mut self, old_id: &str, new_id: Option<&str>) {
        let incoming = match new_id {
            Some(id) => self.resolve(id).await,
            None => {
                let pending = self.pending_replacement.clone();
                if pending.is_none() {
                    self.notify(Notice::warning("Nothing waiting to be added; use: replace <old> <new>"));
                }
                pending
            }
        };
        let Some(asset) = incoming else {
            return;
        };

        match self.favorites.replace(old_id, &asset).await {
            Ok(true) => {
                self.pending_replacement = None;
                self.notify(Notice::success(format!("Replaced {} with {}", old_id, asset.name)));
                self.after_mutation();
            }
            Ok(false) => self.notify(Notice::warning(format!(
                "Cannot replace {} with {}",
                old_id,
                FavoriteRef::from(&asset)
            ))),
            Err(e) => self.storage_failed(e),
        }
    }

    pub async fn clear(&mut self) {
        self.pending_replacement = None;
        match self.favorites.clear().await {
            Ok(true) => {
                self.notify(Notice::success("Watchlist cleared"));
                self.after_mutation();
            }
            Ok(false) => self.notify(Notice::info("Watchlist is already empty")),
            Err(e) => self.storage_failed(e),
        }
    }

    pub fn search(&mut self, query: &str) {
        let matches = filter_assets(&self.assets, query);
        self.renderer.assets(&matches, self.favorites.list());
    }

    pub async fn info(&mut self, id: &str) {
        let provider = self.active_provider();
        let result = lookup_asset(id, &self.assets, provider.as_ref(), self.policy.is_sample()).await;
        self.renderer.lookup(&result);
    }

    fn after_mutation(&mut self) {
        self.renderer.favorites(self.favorites.list());
        self.rebuild_watch();
    }

    fn prompt_replacement(&mut self, asset: Asset, capacity: usize) {
        self.notify(Notice::warning(format!(
            "Favorites are full ({}). Choose one to replace with {}",
            capacity, asset.name
        )));
        self.renderer
            .replacement_prompt(&FavoriteRef::from(&asset), self.favorites.list().items());
        self.renderer.message("Type: replace <id> to swap it in");
        self.pending_replacement = Some(asset);
    }

    fn storage_failed(&mut self, e: MarketError) {
        log::error!("Favorites not saved: {}", e);
        self.notify(Notice::danger(format!("Could not save favorites: {}", e)));
    }
}
