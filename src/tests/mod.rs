//! Shared fakes for pipeline tests


use crate::blockchain::{ClientError, FetchWindow, LedgerSource};
use crate::models::{InternalRecord, LedgerRecord, NativeRecord, RecordKind};
use crate::pricing::{PriceError, PricePoint, PriceRange, PriceSeries, PriceSource};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const ADDRESS: &str = "0x00000000219ab540356cBB839Cbe05303d7705Fa";
pub const COUNTERPARTY: &str = "0x1111111111111111111111111111111111111111";

pub fn native_record(block: u64, timestamp: u64, hash: &str, from: &str, to: &str) -> LedgerRecord {
    LedgerRecord::Native(NativeRecord {
        block_number: block,
        timestamp,
        hash: hash.to_string(),
        from: from.to_string(),
        to: Some(to.to_string()),
        value: "1000000000000000000".to_string(),
        gas_used: "21000".to_string(),
        gas_price: "1000000000".to_string(),
        receipt_status: Some("1".to_string()),
        is_error: Some("0".to_string()),
    })
}

pub fn internal_record(block: u64, timestamp: u64, hash: &str, trace_id: &str) -> LedgerRecord {
    LedgerRecord::Internal(InternalRecord {
        block_number: block,
        timestamp,
        hash: hash.to_string(),
        from: COUNTERPARTY.to_string(),
        to: Some(ADDRESS.to_lowercase()),
        value: "500000000000000000".to_string(),
        is_error: Some("0".to_string()),
        trace_id: Some(trace_id.to_string()),
    })
}

/// Pages served in order per kind; an exhausted script yields empty pages.
#[derive(Default)]
pub struct ScriptedLedger {
    pages: Mutex<HashMap<RecordKind, VecDeque<Result<Vec<LedgerRecord>, String>>>>,
    calls: Mutex<Vec<(RecordKind, FetchWindow)>>,
}

impl ScriptedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, kind: RecordKind, records: Vec<LedgerRecord>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(Ok(records));
        self
    }

    pub fn failure(self, kind: RecordKind, reason: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<(RecordKind, FetchWindow)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, kind: RecordKind) -> usize {
        self.calls().iter().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl LedgerSource for ScriptedLedger {
    async fn fetch_page(
        &self,
        _address: &str,
        kind: RecordKind,
        window: &FetchWindow,
    ) -> Result<Vec<LedgerRecord>, ClientError> {
        self.calls.lock().unwrap().push((kind, window.clone()));
        let next = self
            .pages
            .lock()
            .unwrap()
            .get_mut(&kind)
            .and_then(|pages| pages.pop_front());
        match next {
            Some(Ok(records)) => Ok(records),
            Some(Err(reason)) => Err(ClientError::Upstream(reason)),
            None => Ok(Vec::new()),
        }
    }
}

/// Always answers with a full page: one native record per block, walking
/// down from the window's end block.
#[derive(Default)]
pub struct EndlessLedger {
    calls: Mutex<Vec<FetchWindow>>,
}

impl EndlessLedger {
    pub fn calls(&self) -> Vec<FetchWindow> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerSource for EndlessLedger {
    async fn fetch_page(
        &self,
        _address: &str,
        _kind: RecordKind,
        window: &FetchWindow,
    ) -> Result<Vec<LedgerRecord>, ClientError> {
        self.calls.lock().unwrap().push(window.clone());
        Ok((0..window.page_size as u64)
            .map(|i| {
                let block = window.end_block.saturating_sub(i);
                native_record(block, block * 12, &format!("0x{:x}", block), COUNTERPARTY, ADDRESS)
            })
            .collect())
    }
}

/// Price source returning a fixed series, or failing.
pub struct FakePrices {
    series: Option<Vec<(u64, f64)>>,
    requests: Mutex<Vec<PriceRange>>,
}

impl FakePrices {
    pub fn with_series(points: &[(u64, f64)]) -> Self {
        Self {
            series: Some(points.to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            series: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PriceRange> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceSource for FakePrices {
    async fn price_series(&self, range: PriceRange) -> Result<PriceSeries, PriceError> {
        self.requests.lock().unwrap().push(range);
        match &self.series {
            Some(points) => Ok(PriceSeries::new(
                points
                    .iter()
                    .map(|&(timestamp_ms, price_usd)| PricePoint {
                        timestamp_ms,
                        price_usd,
                    })
                    .collect(),
            )),
            None => Err(PriceError::Status(503)),
        }
    }
}
