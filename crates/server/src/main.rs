use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use coin_finder_core::CoinFinder;
use coin_finder_server::config::ServerConfig;
use coin_finder_server::routes::app_router;
use coin_finder_server::spawn_refresh_loop;
use coin_finder_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = ServerConfig::from_env();
    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", cfg.bind, cfg.port))?;

    let finder = CoinFinder::with_coingecko(
        cfg.refresh.clone(),
        Some(cfg.api_base_url.as_str()),
        cfg.api_key.as_deref(),
    )
    .context("invalid refresh settings")?;

    tracing::info!(
        target_count = cfg.refresh.target_count,
        truncate = cfg.refresh.truncate,
        upstream = %cfg.api_base_url,
        "Coin finder configured"
    );

    let state = AppState::new(finder);

    // Start background refresh; the first fetch happens on the first page request.
    let refresher = spawn_refresh_loop(state.clone());

    let app = app_router(state);

    tracing::info!("Coin finder listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    refresher.abort();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
