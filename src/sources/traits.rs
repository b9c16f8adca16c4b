use async_trait::async_trait;

use crate::data::signals::{FinancialSignal, MarketSignal, TranscriptSignal};
use crate::error::SourceResult;

/// Accounting connector. `Ok(None)` means the prospect has no statements yet.
#[async_trait]
pub trait FinancialSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_financials(&self, prospect_id: &str) -> SourceResult<Option<FinancialSignal>>;
}

/// Economic/industry indicator provider
#[async_trait]
pub trait MarketSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_market(&self, industry: &str) -> SourceResult<Option<MarketSignal>>;
}

/// Text insight producer: call transcript in, structured extraction out
#[async_trait]
pub trait TranscriptAnalyst: Send + Sync {
    fn name(&self) -> &'static str;
    async fn analyze(&self, prospect_id: &str, transcript_text: &str) -> SourceResult<TranscriptSignal>;
}
