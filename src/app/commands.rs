use {
    super::Services,
    crate::{
        CliCommand, FavoritesAction,
        config::COINGECKO,
        data::{AssetLookup, SampleProvider, lookup_asset},
        domain::{Asset, FavoriteRef, filter_assets},
        engine::{Command, WatchController, WatchSetup},
        models::{AddOutcome, FavoritesStore},
        ui::{LogNotifier, Renderer, TerminalRenderer},
    },
    anyhow::{Context, Result, bail},
    tokio::{
        io::{AsyncBufReadExt, BufReader},
        sync::mpsc::{UnboundedSender, unbounded_channel},
    },
};

/// Entry point for every subcommand. `watch` is the default.
pub async fn run(command: Option<CliCommand>, services: Services) -> Result<()> {
    match command.unwrap_or(CliCommand::Watch) {
        CliCommand::Assets { search, limit } => list_assets(&services, search.as_deref(), limit).await,
        CliCommand::Info { id } => show_info(&services, &id).await,
        CliCommand::Favorites { action } => favorites(&services, action).await,
        CliCommand::Watch => watch(services).await,
    }
}

/// Top assets by market cap, sample dataset on failure.
async fn load_assets(services: &Services, limit: usize) -> Vec<Asset> {
    let provider = services.provider();
    match provider.fetch_top_assets(limit).await {
        Ok(assets) => {
            log::info!("Loaded {} assets from {}", assets.len(), provider.source_name());
            assets
        }
        Err(e) => {
            log::warn!("Could not load assets ({}); showing sample data", e);
            SampleProvider::assets().into_iter().take(limit).collect()
        }
    }
}

async fn list_assets(services: &Services, search: Option<&str>, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(COINGECKO.top_assets_limit);
    let assets = load_assets(services, limit).await;
    let favorites = FavoritesStore::load(services.store.clone()).await;

    let matches = filter_assets(&assets, search.unwrap_or(""));
    TerminalRenderer::stdout().assets(&matches, favorites.list());
    Ok(())
}

async fn show_info(services: &Services, id: &str) -> Result<()> {
    let provider = services.provider();
    let result = lookup_asset(id, &[], provider.as_ref(), services.sample_only).await;
    TerminalRenderer::stdout().lookup(&result);
    Ok(())
}

async fn resolve(services: &Services, id: &str) -> Result<Asset> {
    let provider = services.provider();
    match lookup_asset(id, &[], provider.as_ref(), services.sample_only).await {
        AssetLookup::Found { asset, .. } => Ok(asset),
        AssetLookup::NotFound(id) => bail!("Unknown asset '{}'", id),
    }
}

async fn favorites(services: &Services, action: FavoritesAction) -> Result<()> {
    let mut store = FavoritesStore::load(services.store.clone()).await;
    let mut out = TerminalRenderer::stdout();

    match action {
        FavoritesAction::List => {}
        FavoritesAction::Add { id } => {
            let asset = resolve(services, &id).await?;
            match store.add(&asset).await.context("Failed to save favorites")? {
                AddOutcome::Added => log::info!("Added {} to favorites", asset.name),
                AddOutcome::AlreadyPresent => log::info!("{} is already a favorite", asset.name),
                AddOutcome::Rejected { capacity } => {
                    out.replacement_prompt(&FavoriteRef::from(&asset), store.list().items());
                    out.message(&format!("Run: favorites replace <id> {}", asset.id));
                    bail!("Favorites are full ({})", capacity);
                }
            }
        }
        FavoritesAction::Remove { id } => {
            if !store.remove(&id).await.context("Failed to save favorites")? {
                bail!("{} is not a favorite", id);
            }
            log::info!("Removed {} from favorites", id);
        }
        FavoritesAction::Replace { old, new } => {
            let asset = resolve(services, &new).await?;
            if !store
                .replace(&old, &asset)
                .await
                .context("Failed to save favorites")?
            {
                bail!("Cannot replace {} with {}", old, FavoriteRef::from(&asset));
            }
            log::info!("Replaced {} with {}", old, asset.name);
        }
        FavoritesAction::Clear => {
            store.clear().await.context("Failed to save favorites")?;
            log::info!("Watchlist cleared");
        }
    }

    out.favorites(store.list());
    Ok(())
}

/// Interactive session: stdin lines become commands for the controller.
async fn watch(services: Services) -> Result<()> {
    let mut setup = WatchSetup::new(services.live.clone(), services.store.clone(), services.clock.clone());
    setup.sample = services.sample.clone();
    setup.policy = services.policy();

    let mut controller = WatchController::new(
        setup,
        Box::new(TerminalRenderer::stdout()),
        Box::new(LogNotifier),
    )
    .await;

    let (tx, rx) = unbounded_channel();
    // Shown once the initial load is on screen
    let _ = tx.send(Command::Help);
    let reader = tokio::spawn(read_commands(tx));

    controller.run(rx).await;

    reader.abort();
    Ok(())
}

async fn read_commands(tx: UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => match line.parse::<Command>() {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    if tx.send(command).is_err() || quit {
                        break;
                    }
                }
                Err(e) => log::warn!("{}", e),
            },
            Ok(None) => break, // EOF
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
}
