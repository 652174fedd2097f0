use crate::config::Config;
use crate::pricing::series::{PricePoint, PriceRange, PriceSeries};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Price service HTTP {0}")]
    Status(u16),
}

impl PriceError {
    fn http(err: reqwest::Error) -> Self {
        PriceError::Http(err.without_url())
    }
}

/// Historical USD price series for a unix-second range.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price_series(&self, range: PriceRange) -> Result<PriceSeries, PriceError>;
}

#[derive(Debug, Deserialize)]
struct MarketChartRange {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

/// CoinGecko `market_chart/range` client.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    range_url: String,
}

impl CoinGeckoClient {
    pub fn new(config: &Config) -> Result<Self, PriceError> {
        info!("Initializing price client with endpoint: {}", config.coingecko_range_url);

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(PriceError::http)?;

        Ok(Self {
            http,
            range_url: config.coingecko_range_url.clone(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn price_series(&self, range: PriceRange) -> Result<PriceSeries, PriceError> {
        let response = self
            .http
            .get(&self.range_url)
            .query(&[
                ("vs_currency", "usd".to_string()),
                ("from", range.from.to_string()),
                ("to", range.to.to_string()),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(PriceError::http)?;

        if !response.status().is_success() {
            return Err(PriceError::Status(response.status().as_u16()));
        }

        let chart: MarketChartRange = response.json().await.map_err(PriceError::http)?;
        debug!("Price series {}-{}: {} samples", range.from, range.to, chart.prices.len());

        let points = chart
            .prices
            .into_iter()
            .map(|(timestamp_ms, price_usd)| PricePoint {
                timestamp_ms: timestamp_ms as u64,
                price_usd,
            })
            .collect();

        Ok(PriceSeries::new(points))
    }
}
