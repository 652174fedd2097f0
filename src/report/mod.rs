pub mod merger;
pub mod normalizer;

pub use merger::{assemble_report, merge_streams};
pub use normalizer::{format_ether, RecordNormalizer};

use crate::blockchain::{ChunkedLedgerFetcher, ClientError, LedgerSource, Throttle};
use crate::config::Config;
use crate::models::{AggregatedReport, LedgerRecord, RecordKind};
use crate::pricing::{PriceRange, PriceSeries, PriceSource};
use crate::validation::{validate_eth_address, ValidationError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("Failed to retrieve {kind} transactions: {source}")]
    Upstream {
        kind: RecordKind,
        #[source]
        source: ClientError,
    },
}

/// Knobs of the report pipeline.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Cap per stream, applied before native and internal rows are merged.
    pub record_limit: usize,
    pub page_size: usize,
    pub max_chunks: usize,
    pub page_delay: Duration,
    pub value_decimals: usize,
    pub explorer_tx_url: String,
}

impl From<&Config> for ReportSettings {
    fn from(config: &Config) -> Self {
        Self {
            record_limit: config.record_limit,
            page_size: config.page_size,
            max_chunks: config.max_chunks,
            page_delay: config.page_delay,
            value_decimals: config.value_decimals,
            explorer_tx_url: config.explorer_tx_url.clone(),
        }
    }
}

/// Fetch, price, normalize and merge an account's history.
pub struct ReportService {
    ledger: Arc<dyn LedgerSource>,
    prices: Arc<dyn PriceSource>,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(ledger: Arc<dyn LedgerSource>, prices: Arc<dyn PriceSource>, settings: ReportSettings) -> Self {
        Self {
            ledger,
            prices,
            settings,
        }
    }

    pub async fn build_report(
        &self,
        address: &str,
        include_internal: bool,
    ) -> Result<AggregatedReport, ReportError> {
        let address = validate_eth_address(address)?;

        // Pacing is per request; both streams draw from the same limiter
        let throttle = Throttle::new(self.settings.page_delay);
        let fetcher = ChunkedLedgerFetcher::new(
            self.ledger.as_ref(),
            &throttle,
            self.settings.page_size,
            self.settings.max_chunks,
        );
        let limit = self.settings.record_limit;

        let native = async {
            fetcher
                .fetch(address, RecordKind::Native, limit)
                .await
                .map_err(|source| ReportError::Upstream {
                    kind: RecordKind::Native,
                    source,
                })
        };
        let internal = async {
            if !include_internal {
                return Ok(Vec::new());
            }
            fetcher
                .fetch(address, RecordKind::Internal, limit)
                .await
                .map_err(|source| ReportError::Upstream {
                    kind: RecordKind::Internal,
                    source,
                })
        };
        let (native, internal) = futures::future::try_join(native, internal).await?;

        let prices = self.load_prices(native.iter().chain(internal.iter())).await;

        let normalizer = RecordNormalizer::new(
            address,
            &prices,
            self.settings.value_decimals,
            &self.settings.explorer_tx_url,
        );
        let native_rows = native.into_iter().map(|r| normalizer.normalize(r)).collect();
        let internal_rows = internal.into_iter().map(|r| normalizer.normalize(r)).collect();

        let report = assemble_report(address, native_rows, internal_rows);
        info!(
            "Built report for {}: {} rows (internal included: {}, priced: {})",
            address,
            report.count,
            include_internal,
            !prices.is_empty()
        );
        Ok(report)
    }

    /// One series for the whole report. Failures only cost the USD column.
    async fn load_prices<'r, I>(&self, records: I) -> PriceSeries
    where
        I: Iterator<Item = &'r LedgerRecord>,
    {
        let Some(range) = PriceRange::covering(records.map(LedgerRecord::timestamp)) else {
            return PriceSeries::default();
        };

        match self.prices.price_series(range).await {
            Ok(series) => {
                if series.is_empty() {
                    warn!("Price series for {}-{} is empty; USD values omitted", range.from, range.to);
                }
                series
            }
            Err(e) => {
                warn!("Price lookup for {}-{} failed; USD values omitted: {}", range.from, range.to, e);
                PriceSeries::default()
            }
        }
    }
}
