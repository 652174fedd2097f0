// Initialize configuration
// Set up logging
// Build upstream clients and shared state
// Start HTTP server with graceful shutdown

use eth_tx_report::{api, config::Config, state::AppState, CoinGeckoClient, EtherscanClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting eth-tx-report");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        "Configuration loaded: chain {}, record limit {} per stream, page delay {:?}",
        config.chain_id,
        config.record_limit,
        config.page_delay
    );

    let ledger = Arc::new(EtherscanClient::new(&config)?);
    let prices = Arc::new(CoinGeckoClient::new(&config)?);

    // Create shared state
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let app_state = Arc::new(AppState::new(&config, ledger, prices));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        signal_token.cancel();
    });

    // Start HTTP server
    let app = api::create_router(app_state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
