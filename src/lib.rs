pub mod api;
pub mod blockchain;
pub mod config;
pub mod models;
pub mod pricing;
pub mod report;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience if desired
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::{create_router, ReportQuery};
pub use blockchain::{ChunkedLedgerFetcher, EtherscanClient, LedgerSource, Throttle};
pub use models::{AggregatedReport, NormalizedTransaction};
pub use pricing::{CoinGeckoClient, PriceSeries, PriceSource};
pub use report::{ReportError, ReportService, ReportSettings};
pub use validation::{parse_include_internal, validate_eth_address};
