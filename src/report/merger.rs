use crate::models::{AggregatedReport, NormalizedTransaction};

/// Native rows followed by internal rows, newest first.
///
/// The sort is stable: rows with equal timestamps keep their input order.
/// Each stream is capped before it gets here, so the result can hold up to
/// twice the per-stream limit.
pub fn merge_streams(
    native: Vec<NormalizedTransaction>,
    internal: Vec<NormalizedTransaction>,
) -> Vec<NormalizedTransaction> {
    let mut rows = native;
    rows.extend(internal);
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

pub fn assemble_report(
    address: &str,
    native: Vec<NormalizedTransaction>,
    internal: Vec<NormalizedTransaction>,
) -> AggregatedReport {
    AggregatedReport::new(address, merge_streams(native, internal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordKind, TxStatus, TxType};

    fn row(kind: RecordKind, hash: &str, timestamp: u64) -> NormalizedTransaction {
        NormalizedTransaction {
            kind,
            hash: hash.to_string(),
            timestamp,
            date_time_utc: String::new(),
            status: TxStatus::Success,
            tx_type: TxType::Other,
            from: String::new(),
            to: String::new(),
            value_eth: "0".to_string(),
            value_usd: None,
            gas_fee_eth: None,
            explorer_url: String::new(),
        }
    }

    #[test]
    fn interleaves_streams_newest_first() {
        let native = vec![row(RecordKind::Native, "n3", 30), row(RecordKind::Native, "n1", 10)];
        let internal = vec![row(RecordKind::Internal, "i2", 20), row(RecordKind::Internal, "i0", 5)];

        let merged = merge_streams(native, internal);
        let hashes: Vec<_> = merged.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["n3", "i2", "n1", "i0"]);
        assert!(merged.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let native = vec![row(RecordKind::Native, "a", 7), row(RecordKind::Native, "b", 7)];
        let internal = vec![row(RecordKind::Internal, "c", 7)];

        let merged = merge_streams(native, internal);
        let hashes: Vec<_> = merged.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["a", "b", "c"]);
    }

    #[test]
    fn report_counts_rows() {
        let report = assemble_report("0xabc", Vec::new(), Vec::new());
        assert_eq!(report.count, 0);
        assert!(report.rows.is_empty());

        let report = assemble_report("0xabc", vec![row(RecordKind::Native, "x", 1)], Vec::new());
        assert_eq!(report.count, 1);
        assert_eq!(report.address, "0xabc");
    }
}
