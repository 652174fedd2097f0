// Manual smoke run of the report pipeline against the configured upstreams.
// Usage: cargo run --bin test_report -- <address> [--internal]

use eth_tx_report::{config::Config, state::AppState, CoinGeckoClient, EtherscanClient};
use std::sync::Arc;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let mut args = std::env::args().skip(1);
    let address = args.next().unwrap_or_default();
    let include_internal = args.any(|arg| arg == "--internal");

    let config = Config::from_env();
    let ledger = Arc::new(EtherscanClient::new(&config)?);
    let prices = Arc::new(CoinGeckoClient::new(&config)?);
    let state = AppState::new(&config, ledger, prices);

    info!("Building report for {} (internal: {})", address, include_internal);

    match state.reports.build_report(&address, include_internal).await {
        Ok(report) => {
            info!("✅ {} rows", report.count);
            for row in report.rows.iter().take(10) {
                info!(
                    "{} {:<26} {:>8} {} ETH ({:?} USD)",
                    row.date_time_utc, row.tx_type, format!("{:?}", row.status), row.value_eth, row.value_usd
                );
            }
            let priced = report.rows.iter().filter(|r| r.value_usd.is_some()).count();
            info!("{} of {} rows priced", priced, report.count);
        }
        Err(e) => {
            error!("❌ Report failed: {}", e);
        }
    }

    Ok(())
}
