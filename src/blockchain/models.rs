use crate::blockchain::client::ClientError;
use crate::models::{InternalRecord, LedgerRecord, NativeRecord, RecordKind};
use serde::Deserialize;
use serde_json::Value;

/// Messages the account API uses for "nothing in this window" (status "0").
const NO_RECORDS_MESSAGES: &[&str] = &["No transactions found", "No records found"];

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// Account API envelope after validation.
#[derive(Debug, PartialEq)]
pub enum Envelope {
    Records(Vec<Value>),
    Empty,
    Failure(String),
}

/// Parse an account API body (`{status, message, result}`) into an [`Envelope`].
pub fn parse_envelope(body: &str) -> Result<Envelope, ClientError> {
    let raw: RawEnvelope = serde_json::from_str(body)
        .map_err(|_| ClientError::BadJson(excerpt(body)))?;

    if NO_RECORDS_MESSAGES.contains(&raw.message.as_str()) {
        return Ok(Envelope::Empty);
    }

    // Status "0" sometimes still carries an array; the rows win
    match raw.result {
        Value::Array(rows) => Ok(Envelope::Records(rows)),
        Value::String(reason) if !reason.is_empty() => Ok(Envelope::Failure(reason)),
        _ if !raw.message.is_empty() => Ok(Envelope::Failure(raw.message)),
        _ => Ok(Envelope::Failure(format!(
            "Unexpected Etherscan response (status {})",
            raw.status
        ))),
    }
}

/// Turn envelope rows into typed records of `kind`. One bad row fails the page.
pub fn extract_records(kind: RecordKind, rows: Vec<Value>) -> Result<Vec<LedgerRecord>, ClientError> {
    rows.into_iter()
        .map(|row| {
            let record = match kind {
                RecordKind::Native => serde_json::from_value::<NativeRecord>(row).map(LedgerRecord::Native),
                RecordKind::Internal => {
                    serde_json::from_value::<InternalRecord>(row).map(LedgerRecord::Internal)
                }
            };
            record.map_err(|e| ClientError::MalformedRecord {
                kind,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// First 200 characters of an upstream body, for error messages.
pub fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}
