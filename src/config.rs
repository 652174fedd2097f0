// Configuration for:
// - Server listening address/port
// - Ledger-query (Etherscan) endpoint, key and chain
// - Historical price endpoint
// - Pagination caps and request pacing

use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub etherscan_api_url: String,
    pub etherscan_api_key: Option<String>,
    pub chain_id: u64,
    pub coingecko_range_url: String,
    pub explorer_tx_url: String,
    pub record_limit: usize,
    pub page_size: usize,
    pub max_chunks: usize,
    pub page_delay: Duration,
    pub value_decimals: usize,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            etherscan_api_url: "https://api.etherscan.io/v2/api".to_string(),
            etherscan_api_key: None,
            chain_id: 1,
            coingecko_range_url:
                "https://api.coingecko.com/api/v3/coins/ethereum/market_chart/range".to_string(),
            explorer_tx_url: "https://etherscan.io/tx/".to_string(),
            record_limit: 1000,
            page_size: 10_000,
            max_chunks: 1000,
            page_delay: Duration::from_millis(220),
            value_decimals: 8,
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = parse_var("SERVER_PORT", defaults.server_port);
        let etherscan_api_url = env::var("ETHERSCAN_API_URL").unwrap_or(defaults.etherscan_api_url);
        // Blank keys are treated as absent so the parameter is left off the request
        let etherscan_api_key = env::var("ETHERSCAN_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let chain_id = parse_var("CHAIN_ID", defaults.chain_id);
        let coingecko_range_url =
            env::var("COINGECKO_RANGE_URL").unwrap_or(defaults.coingecko_range_url);
        let explorer_tx_url = env::var("EXPLORER_TX_URL").unwrap_or(defaults.explorer_tx_url);
        let record_limit = parse_var("RECORD_LIMIT", defaults.record_limit);
        let page_size = parse_var("PAGE_SIZE", defaults.page_size);
        let max_chunks = parse_var("MAX_CHUNKS", defaults.max_chunks);
        let page_delay = env::var("PAGE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.page_delay);
        let value_decimals = parse_var("VALUE_DECIMALS", defaults.value_decimals);
        let http_timeout_secs = parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs);

        Self {
            server_host,
            server_port,
            etherscan_api_url,
            etherscan_api_key,
            chain_id,
            coingecko_range_url,
            explorer_tx_url,
            record_limit,
            page_size,
            max_chunks,
            page_delay,
            value_decimals,
            http_timeout_secs,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upstream_limits() {
        let config = Config::default();
        assert_eq!(config.record_limit, 1000);
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.max_chunks, 1000);
        assert_eq!(config.page_delay, Duration::from_millis(220));
        assert!(config.etherscan_api_key.is_none());
    }

    #[test]
    fn parse_var_falls_back_on_garbage() {
        env::set_var("ETH_TX_REPORT_TEST_GARBAGE", "not-a-number");
        assert_eq!(parse_var("ETH_TX_REPORT_TEST_GARBAGE", 42u16), 42);
        env::remove_var("ETH_TX_REPORT_TEST_GARBAGE");
        assert_eq!(parse_var("ETH_TX_REPORT_TEST_MISSING", 7usize), 7);
    }
}
