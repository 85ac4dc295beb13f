//! Roster engine - Main entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_engine::infrastructure::{clock::SystemClock, config::EngineConfig};
use roster_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting roster engine");

    let config = EngineConfig::from_env();
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let sweep_interval = config.cache_sweep_interval;
    let app = Arc::new(App::new(config, Arc::new(SystemClock::new())).await?);

    // Spawn cache sweeper
    let cancel = CancellationToken::new();
    let sweeper = {
        let app = app.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        app.sweep_cache().await;
                    }
                }
            }
        })
    };

    tracing::info!("Roster engine ready");
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    cancel.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Cache sweeper ended abnormally");
    }
    app.shutdown().await;

    tracing::info!("Roster engine stopped");
    Ok(())
}
