pub mod client;
pub mod series;

pub use client::{CoinGeckoClient, PriceError, PriceSource};
pub use series::{PricePoint, PriceRange, PriceSeries};
