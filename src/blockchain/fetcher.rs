use crate::blockchain::client::{ClientError, LedgerSource};
use crate::blockchain::throttle::Throttle;
use crate::models::{LedgerRecord, RecordKind};
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// Block number standing in for "chain tip" on the first request.
pub const CHAIN_TIP_SENTINEL: u64 = 99_999_999;

/// Block range requested from the account API, always newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub start_block: u64,
    pub end_block: u64,
    pub page: u32,
    pub page_size: usize,
}

impl FetchWindow {
    pub fn from_tip(page_size: usize) -> Self {
        Self {
            start_block: 0,
            end_block: CHAIN_TIP_SENTINEL,
            page: 1,
            page_size,
        }
    }
}

/// Pages backward through history, one block window at a time.
///
/// Always asks for page 1 of `[0, end_block]` sorted descending and moves
/// `end_block` below the last block seen, so pages never overlap and the
/// upstream's page-number cap never applies.
pub struct ChunkedLedgerFetcher<'a> {
    source: &'a dyn LedgerSource,
    throttle: &'a Throttle,
    page_size: usize,
    max_chunks: usize,
}

impl<'a> ChunkedLedgerFetcher<'a> {
    pub fn new(
        source: &'a dyn LedgerSource,
        throttle: &'a Throttle,
        page_size: usize,
        max_chunks: usize,
    ) -> Self {
        Self {
            source,
            throttle,
            page_size: page_size.max(1),
            max_chunks,
        }
    }

    /// Up to `limit` records of `kind`, newest first.
    pub async fn fetch(
        &self,
        address: &str,
        kind: RecordKind,
        limit: usize,
    ) -> Result<Vec<LedgerRecord>, ClientError> {
        let mut records: Vec<LedgerRecord> = Vec::with_capacity(limit.min(self.page_size));
        let mut seen = HashSet::new();
        let mut window = FetchWindow::from_tip(self.page_size);
        let mut chunks = 0;

        while chunks < self.max_chunks && records.len() < limit {
            self.throttle.wait().await;

            let page = match self.source.fetch_page(address, kind, &window).await {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to fetch {} records for {} up to block {}: {}", kind, address, window.end_block, e);
                    return Err(e);
                }
            };

            debug!(
                "Chunk {}: {} {} records for {} in blocks 0-{}",
                chunks,
                page.len(),
                kind,
                address,
                window.end_block
            );

            if page.is_empty() {
                break;
            }

            let page_len = page.len();
            let last_block = page.last().map(LedgerRecord::block_number).unwrap_or(0);

            for record in page {
                if records.len() >= limit {
                    break;
                }
                if seen.insert(record.identity()) {
                    records.push(record);
                }
            }

            if records.len() >= limit || page_len < self.page_size {
                break;
            }

            // Next window ends just below the oldest block of this page
            match last_block.checked_sub(1) {
                Some(next_end) if next_end < window.end_block => window.end_block = next_end,
                _ => {
                    warn!(
                        "Stopping {} fetch for {}: block cursor cannot move below {}",
                        kind, address, last_block
                    );
                    break;
                }
            }
            chunks += 1;
        }

        if chunks >= self.max_chunks {
            warn!("Hit chunk ceiling of {} fetching {} records for {}", self.max_chunks, kind, address);
        }

        Ok(records)
    }
}
