use crate::blockchain::LedgerSource;
use crate::config::Config;
use crate::report::{ReportService, ReportSettings};
use crate::pricing::PriceSource;
use std::sync::Arc;

pub struct AppState {
    pub reports: ReportService,
}

impl AppState {
    pub fn new(config: &Config, ledger: Arc<dyn LedgerSource>, prices: Arc<dyn PriceSource>) -> Self {
        let reports = ReportService::new(ledger, prices, ReportSettings::from(config));
        Self { reports }
    }
}
