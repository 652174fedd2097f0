use crate::models::{
    Direction, InternalRecord, LedgerRecord, NativeRecord, NormalizedTransaction, RecordKind,
    TxStatus, TxType,
};
use crate::pricing::PriceSeries;
use chrono::{DateTime, SecondsFormat, Utc};

pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;
const WEI_DIGITS: usize = 18;
const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Format a wei amount as ether, truncated to `decimals` places.
pub fn format_ether(wei: u128, decimals: usize) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;

    let padded = format!("{:0width$}", frac, width = WEI_DIGITS);
    let fraction = padded[..decimals.min(WEI_DIGITS)].trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a decimal (or `0x` hex) wei string.
pub fn parse_wei(wei: &str) -> Option<u128> {
    let wei = wei.trim();
    match wei.strip_prefix("0x") {
        Some(hex) => u128::from_str_radix(hex, 16).ok(),
        None => wei.parse().ok(),
    }
}

/// [`format_ether`] over a wei string; anything unparsable renders as `"0"`.
pub fn format_ether_str(wei: &str, decimals: usize) -> String {
    parse_wei(wei)
        .map(|wei| format_ether(wei, decimals))
        .unwrap_or_else(|| "0".to_string())
}

/// `gasUsed * gasPrice` in ether. Unparsable or overflowing input is `"0"`.
pub fn gas_fee_ether(gas_used: &str, gas_price: &str, decimals: usize) -> String {
    parse_wei(gas_used)
        .zip(parse_wei(gas_price))
        .and_then(|(used, price)| used.checked_mul(price))
        .map(|fee| format_ether(fee, decimals))
        .unwrap_or_else(|| "0".to_string())
}

pub fn native_status(record: &NativeRecord) -> TxStatus {
    let receipt = record.receipt_status.as_deref();
    let errored = record.is_error.as_deref() == Some("1");

    if receipt == Some("1") && !errored {
        TxStatus::Success
    } else if receipt == Some("0") || errored {
        TxStatus::Failed
    } else {
        TxStatus::Pending
    }
}

/// Traces only exist for mined parents, so an internal record is never pending.
pub fn internal_status(record: &InternalRecord) -> TxStatus {
    if record.is_error.as_deref() == Some("1") {
        TxStatus::Failed
    } else {
        TxStatus::Success
    }
}

/// Direction of a transfer relative to `address_lc` (already lowercased).
pub fn classify(address_lc: &str, from: &str, to: Option<&str>) -> Direction {
    let from = from.trim().to_lowercase();
    let to = to.unwrap_or_default().trim().to_lowercase();

    let from_is_address = from == address_lc;
    let to_is_address = to == address_lc;
    let to_is_empty = to.is_empty() || to == "0x" || to == ZERO_ADDRESS;

    if from_is_address && to_is_empty {
        Direction::ContractCreation
    } else if from_is_address && to_is_address {
        Direction::SelfTransfer
    } else if to_is_address {
        Direction::Received
    } else if from_is_address {
        Direction::Sent
    } else {
        Direction::Other
    }
}

/// `value_eth * price` rounded to cents.
pub fn usd_value(value_eth: &str, price: Option<f64>) -> Option<f64> {
    let price = price?;
    let eth: f64 = value_eth.parse().ok()?;
    let usd = (eth * price * 100.0).round() / 100.0;
    usd.is_finite().then_some(usd)
}

fn utc_string(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Converts raw records into report rows for one queried address.
pub struct RecordNormalizer<'a> {
    address_lc: String,
    prices: &'a PriceSeries,
    decimals: usize,
    explorer_tx_url: &'a str,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(address: &str, prices: &'a PriceSeries, decimals: usize, explorer_tx_url: &'a str) -> Self {
        Self {
            address_lc: address.trim().to_lowercase(),
            prices,
            decimals,
            explorer_tx_url,
        }
    }

    pub fn normalize(&self, record: LedgerRecord) -> NormalizedTransaction {
        match record {
            LedgerRecord::Native(record) => self.normalize_native(record),
            LedgerRecord::Internal(record) => self.normalize_internal(record),
        }
    }

    fn normalize_native(&self, record: NativeRecord) -> NormalizedTransaction {
        let status = native_status(&record);
        let direction = classify(&self.address_lc, &record.from, record.to.as_deref());
        let value_eth = format_ether_str(&record.value, self.decimals);
        let gas_fee_eth = gas_fee_ether(&record.gas_used, &record.gas_price, self.decimals);
        let value_usd = usd_value(&value_eth, self.prices.nearest(record.timestamp));

        NormalizedTransaction {
            kind: RecordKind::Native,
            explorer_url: format!("{}{}", self.explorer_tx_url, record.hash),
            hash: record.hash,
            timestamp: record.timestamp,
            date_time_utc: utc_string(record.timestamp),
            status,
            tx_type: TxType::new(RecordKind::Native, direction),
            from: record.from,
            to: record.to.unwrap_or_default(),
            value_eth,
            value_usd,
            gas_fee_eth: Some(gas_fee_eth),
        }
    }

    fn normalize_internal(&self, record: InternalRecord) -> NormalizedTransaction {
        let status = internal_status(&record);
        let direction = classify(&self.address_lc, &record.from, record.to.as_deref());
        let value_eth = format_ether_str(&record.value, self.decimals);
        let value_usd = usd_value(&value_eth, self.prices.nearest(record.timestamp));

        // The parent transaction pays the gas
        NormalizedTransaction {
            kind: RecordKind::Internal,
            explorer_url: format!("{}{}", self.explorer_tx_url, record.hash),
            hash: record.hash,
            timestamp: record.timestamp,
            date_time_utc: utc_string(record.timestamp),
            status,
            tx_type: TxType::new(RecordKind::Internal, direction),
            from: record.from,
            to: record.to.unwrap_or_default(),
            value_eth,
            value_usd,
            gas_fee_eth: None,
        }
    }
}
