// Raw ledger records as the account API returns them
// Normalized report rows and the report envelope

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which account-API listing a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Native,
    Internal,
}

impl RecordKind {
    /// The `action` parameter of the account API for this kind.
    pub fn action(&self) -> &'static str {
        match self {
            RecordKind::Native => "txlist",
            RecordKind::Internal => "txlistinternal",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Native => write!(f, "native"),
            RecordKind::Internal => write!(f, "internal"),
        }
    }
}

/// A mined transaction (`txlist`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeRecord {
    #[serde(deserialize_with = "u64_from_string")]
    pub block_number: u64,
    #[serde(rename = "timeStamp", deserialize_with = "u64_from_string")]
    pub timestamp: u64,
    pub hash: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub gas_used: String,
    #[serde(default)]
    pub gas_price: String,
    #[serde(rename = "txreceipt_status", default)]
    pub receipt_status: Option<String>,
    #[serde(default)]
    pub is_error: Option<String>,
}

/// A value transfer executed inside a mined transaction (`txlistinternal`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalRecord {
    #[serde(deserialize_with = "u64_from_string")]
    pub block_number: u64,
    #[serde(rename = "timeStamp", deserialize_with = "u64_from_string")]
    pub timestamp: u64,
    pub hash: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_error: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerRecord {
    Native(NativeRecord),
    Internal(InternalRecord),
}

impl LedgerRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            LedgerRecord::Native(_) => RecordKind::Native,
            LedgerRecord::Internal(_) => RecordKind::Internal,
        }
    }

    pub fn block_number(&self) -> u64 {
        match self {
            LedgerRecord::Native(r) => r.block_number,
            LedgerRecord::Internal(r) => r.block_number,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            LedgerRecord::Native(r) => r.timestamp,
            LedgerRecord::Internal(r) => r.timestamp,
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            LedgerRecord::Native(r) => &r.hash,
            LedgerRecord::Internal(r) => &r.hash,
        }
    }

    /// Identity within one stream. Several traces can share a parent hash,
    /// so internal records are told apart by their trace id as well.
    pub fn identity(&self) -> String {
        match self {
            LedgerRecord::Native(r) => r.hash.to_lowercase(),
            LedgerRecord::Internal(r) => format!(
                "{}:{}",
                r.hash.to_lowercase(),
                r.trace_id.as_deref().unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxStatus {
    Success,
    Failed,
    Pending,
}

/// Direction of a transfer relative to the queried address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Received,
    Sent,
    SelfTransfer,
    ContractCreation,
    Other,
}

/// Classification label of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxType {
    Received,
    Sent,
    #[serde(rename = "Self")]
    SelfTransfer,
    #[serde(rename = "Contract Creation")]
    ContractCreation,
    Other,
    #[serde(rename = "Internal Received")]
    InternalReceived,
    #[serde(rename = "Internal Sent")]
    InternalSent,
    #[serde(rename = "Internal Self")]
    InternalSelf,
    #[serde(rename = "Internal Contract Creation")]
    InternalContractCreation,
    #[serde(rename = "Internal")]
    InternalOther,
}

impl TxType {
    pub fn new(kind: RecordKind, direction: Direction) -> Self {
        match (kind, direction) {
            (RecordKind::Native, Direction::Received) => TxType::Received,
            (RecordKind::Native, Direction::Sent) => TxType::Sent,
            (RecordKind::Native, Direction::SelfTransfer) => TxType::SelfTransfer,
            (RecordKind::Native, Direction::ContractCreation) => TxType::ContractCreation,
            (RecordKind::Native, Direction::Other) => TxType::Other,
            (RecordKind::Internal, Direction::Received) => TxType::InternalReceived,
            (RecordKind::Internal, Direction::Sent) => TxType::InternalSent,
            (RecordKind::Internal, Direction::SelfTransfer) => TxType::InternalSelf,
            (RecordKind::Internal, Direction::ContractCreation) => TxType::InternalContractCreation,
            (RecordKind::Internal, Direction::Other) => TxType::InternalOther,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Received => "Received",
            TxType::Sent => "Sent",
            TxType::SelfTransfer => "Self",
            TxType::ContractCreation => "Contract Creation",
            TxType::Other => "Other",
            TxType::InternalReceived => "Internal Received",
            TxType::InternalSent => "Internal Sent",
            TxType::InternalSelf => "Internal Self",
            TxType::InternalContractCreation => "Internal Contract Creation",
            TxType::InternalOther => "Internal",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub kind: RecordKind,
    pub hash: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: u64,
    pub date_time_utc: String,
    pub status: TxStatus,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub from: String,
    pub to: String,
    pub value_eth: String,
    pub value_usd: Option<f64>,
    pub gas_fee_eth: Option<String>,
    pub explorer_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedReport {
    pub address: String,
    pub count: usize,
    pub rows: Vec<NormalizedTransaction>,
}

impl AggregatedReport {
    pub fn new(address: &str, rows: Vec<NormalizedTransaction>) -> Self {
        Self {
            address: address.to_string(),
            count: rows.len(),
            rows,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Number(u64),
    String(String),
}

fn u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Number(n) => Ok(n),
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_record_parses_etherscan_shape() {
        let raw = json!({
            "blockNumber": "17000000",
            "timeStamp": "1681000000",
            "hash": "0xabc",
            "from": "0x1",
            "to": "",
            "value": "1000",
            "gas": "21000",
            "gasPrice": "20000000000",
            "gasUsed": "21000",
            "isError": "0",
            "txreceipt_status": "1"
        });
        let record: NativeRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.block_number, 17_000_000);
        assert_eq!(record.timestamp, 1_681_000_000);
        assert_eq!(record.to.as_deref(), Some(""));
        assert_eq!(record.receipt_status.as_deref(), Some("1"));
    }

    #[test]
    fn internal_record_accepts_null_to_and_numeric_block() {
        let raw = json!({
            "blockNumber": 42,
            "timeStamp": "1600000000",
            "hash": "0xdef",
            "from": "0x1",
            "to": null,
            "value": "5",
            "isError": "1",
            "traceId": "0_1"
        });
        let record: InternalRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.block_number, 42);
        assert!(record.to.is_none());
        assert_eq!(record.trace_id.as_deref(), Some("0_1"));
    }

    #[test]
    fn non_numeric_block_is_rejected() {
        let raw = json!({
            "blockNumber": "latest",
            "timeStamp": "1",
            "hash": "0x1",
            "value": "0"
        });
        assert!(serde_json::from_value::<InternalRecord>(raw).is_err());
    }

    #[test]
    fn tx_type_labels_serialize_as_display_strings() {
        let internal = TxType::new(RecordKind::Internal, Direction::Other);
        assert_eq!(serde_json::to_value(internal).unwrap(), json!("Internal"));
        let creation = TxType::new(RecordKind::Native, Direction::ContractCreation);
        assert_eq!(serde_json::to_value(creation).unwrap(), json!("Contract Creation"));
        assert_eq!(
            TxType::new(RecordKind::Internal, Direction::SelfTransfer).to_string(),
            "Internal Self"
        );
    }
}
