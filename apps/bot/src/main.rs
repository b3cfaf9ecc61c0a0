//! turnpost bot entry point.

mod app;
mod config;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting turnpost bot");

    let path = config::config_path(std::env::args().nth(1), std::env::var("TURNPOST_CONFIG").ok());
    let mut config = config::BotConfig::load_from(&path)?;
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    tracing::info!(
        path = %path.display(),
        bot_user_id = %config.bot_user_id,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::run(config))?;

    tracing::info!("bot shut down cleanly");
    Ok(())
}
