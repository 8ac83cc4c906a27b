use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use server::config::ServerConfig;
use server::{build_router, with_rate_limit, AppState};
use tts_core::PlaceholderProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _ = dotenv::dotenv();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting synthesis server...");

    let config = ServerConfig::from_env();
    info!(
        "Server configuration loaded: port={}, audio_dir={}, ttl={}s, provider_timeout={}s, max_text_length={:?}",
        config.port,
        config.audio_dir.display(),
        config.audio_ttl_secs,
        config.provider_timeout_secs,
        config.max_text_length
    );

    let store = config.audio_store();
    tokio::fs::create_dir_all(store.dir())
        .await
        .with_context(|| format!("Failed to create audio directory {}", store.dir().display()))?;
    let _sweeper = store.spawn_sweeper(config.sweep_interval());

    // The real speech backend replaces this provider
    let provider = Arc::new(PlaceholderProvider::new(store));
    let state = AppState::new(provider, config.clone());

    let app = build_router(state).layer(TimeoutLayer::new(config.request_timeout()));
    let app = with_rate_limit(app, &config)?;

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
