pub mod client;
pub mod fetcher;
pub mod models;
pub mod throttle;

// Re-exports for convenience
pub use client::{ClientError, EtherscanClient, LedgerSource};
pub use fetcher::{ChunkedLedgerFetcher, FetchWindow, CHAIN_TIP_SENTINEL};
pub use throttle::Throttle;
