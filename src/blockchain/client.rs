use crate::blockchain::fetcher::FetchWindow;
use crate::blockchain::models::{excerpt, extract_records, parse_envelope, Envelope};
use crate::config::Config;
use crate::models::{LedgerRecord, RecordKind};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ClientError {
    /// Built through [`ClientError::http`] so the request URL (and its
    /// `apikey`) never reaches callers or logs.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Etherscan HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Etherscan bad JSON: {0}")]
    BadJson(String),

    #[error("Etherscan error: {0}")]
    Upstream(String),

    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: RecordKind, reason: String },
}

impl ClientError {
    fn http(err: reqwest::Error) -> Self {
        ClientError::Http(err.without_url())
    }
}

/// One page of account history, newest first.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn fetch_page(
        &self,
        address: &str,
        kind: RecordKind,
        window: &FetchWindow,
    ) -> Result<Vec<LedgerRecord>, ClientError>;
}

/// Etherscan v2 account API client.
pub struct EtherscanClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    chain_id: u64,
}

impl EtherscanClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        info!(
            "Initializing Etherscan client with endpoint: {}, chain id: {}",
            config.etherscan_api_url, config.chain_id
        );

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(ClientError::http)?;

        Ok(Self {
            http,
            api_url: config.etherscan_api_url.clone(),
            api_key: config.etherscan_api_key.clone(),
            chain_id: config.chain_id,
        })
    }

    fn query_params(&self, address: &str, kind: RecordKind, window: &FetchWindow) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("chainid", self.chain_id.to_string()),
            ("module", "account".to_string()),
            ("action", kind.action().to_string()),
            ("address", address.to_string()),
            ("startblock", window.start_block.to_string()),
            ("endblock", window.end_block.to_string()),
            ("page", window.page.to_string()),
            ("offset", window.page_size.to_string()),
            ("sort", "desc".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.clone()));
        }
        params
    }
}

#[async_trait]
impl LedgerSource for EtherscanClient {
    async fn fetch_page(
        &self,
        address: &str,
        kind: RecordKind,
        window: &FetchWindow,
    ) -> Result<Vec<LedgerRecord>, ClientError> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&self.query_params(address, kind, window))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(ClientError::http)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::http)?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        match parse_envelope(&body)? {
            Envelope::Records(rows) => {
                debug!("{} {} rows for {} up to block {}", rows.len(), kind, address, window.end_block);
                extract_records(kind, rows)
            }
            Envelope::Empty => Ok(Vec::new()),
            Envelope::Failure(reason) => Err(ClientError::Upstream(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_follow_window_and_omit_missing_key() {
        let config = Config::default();
        let client = EtherscanClient::new(&config).unwrap();
        let window = FetchWindow::from_tip(10_000);
        let params = client.query_params("0xabc", RecordKind::Internal, &window);

        let get = |name: &str| {
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("action"), Some("txlistinternal"));
        assert_eq!(get("startblock"), Some("0"));
        assert_eq!(get("endblock"), Some("99999999"));
        assert_eq!(get("page"), Some("1"));
        assert_eq!(get("offset"), Some("10000"));
        assert_eq!(get("sort"), Some("desc"));
        assert_eq!(get("chainid"), Some("1"));
        assert_eq!(get("apikey"), None);
    }

    #[test]
    fn api_key_is_appended_when_configured() {
        let config = Config {
            etherscan_api_key: Some("KEY".to_string()),
            ..Config::default()
        };
        let client = EtherscanClient::new(&config).unwrap();
        let params = client.query_params("0xabc", RecordKind::Native, &FetchWindow::from_tip(10));
        assert!(params.contains(&("apikey", "KEY".to_string())));
        assert!(params.contains(&("action", "txlist".to_string())));
    }
}
