//! Wires the client, dispatcher and poll loop together.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use turnpost_dispatch::{Dispatcher, FileWatermarkStore, Poller, run_poll_loop};
use turnpost_games::GameRegistry;
use turnpost_twitter::Client;

use crate::config::BotConfig;

/// Runs the bot until ctrl-c.
pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let client = Client::new(config.credentials.to_credentials())?
        .with_base_urls(&config.api_base_url, &config.upload_base_url);

    let registry = GameRegistry::with_default_games();
    tracing::info!(games = ?registry.keywords(), "games registered");

    let dispatcher = Dispatcher::new(Arc::new(client), registry, &config.bot_user_id)
        .with_policy(config.rejection_policy)
        .with_pacing(config.pacing());

    let store = Arc::new(FileWatermarkStore::new(&config.watermark_path));
    let poller = Poller::new(Arc::new(dispatcher), store, config.poll_config())?;

    let cancel = CancellationToken::new();
    let mut poll_loop = tokio::spawn(run_poll_loop(poller, cancel.clone()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
            cancel.cancel();
            poll_loop.await?;
        }
        res = &mut poll_loop => {
            res?;
        }
    }

    Ok(())
}
