//! Signal collector: fans out to the three sources concurrently. Each fetch
//! has its own timeout and degrades to "absent" on its own.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::events;
use crate::data::signals::{
    CompanyInfo, FinancialSignal, SignalBundle, SourceReports, SourceStatus,
};
use crate::error::SourceResult;
use crate::sources::{FinancialSource, MarketSource, SignalSources, TranscriptAnalyst};

#[derive(Clone, Debug, PartialEq)]
pub struct CollectedSignals {
    pub bundle: SignalBundle,
    pub reports: SourceReports,
}

#[derive(Clone, Copy, Debug)]
pub struct SignalRequest<'a> {
    pub prospect_id: &'a str,
    pub company: &'a CompanyInfo,
    pub transcript_text: Option<&'a str>,
    pub financial_data: Option<&'a FinancialSignal>,
}

#[derive(Clone)]
pub struct SignalCollector {
    financial: Arc<dyn FinancialSource>,
    market: Arc<dyn MarketSource>,
    transcript: Arc<dyn TranscriptAnalyst>,
    fetch_timeout: Duration,
}

impl SignalCollector {
    pub fn new(sources: SignalSources, fetch_timeout: Duration) -> Self {
        Self {
            financial: sources.financial,
            market: sources.market,
            transcript: sources.transcript,
            fetch_timeout,
        }
    }

    pub async fn collect(&self, request: &SignalRequest<'_>) -> CollectedSignals {
        let ((financial, financial_status), (transcript, transcript_status), (market, market_status)) = tokio::join!(
            self.collect_financial(request),
            self.collect_transcript(request),
            self.collect_market(request),
        );

        let reports = SourceReports {
            financial: financial_status,
            transcript: transcript_status,
            market: market_status,
        };
        info!(
            "📡 [COLLECTOR] {} financial={:?} transcript={:?} market={:?}",
            request.prospect_id, reports.financial, reports.transcript, reports.market
        );

        CollectedSignals {
            bundle: SignalBundle {
                financial,
                transcript,
                market,
            },
            reports,
        }
    }

    async fn collect_financial(&self, request: &SignalRequest<'_>) -> (Option<FinancialSignal>, SourceStatus) {
        if let Some(data) = request.financial_data {
            return (Some(data.clone()), SourceStatus::Supplied);
        }
        guarded(
            self.financial.name(),
            request.prospect_id,
            self.fetch_timeout,
            self.financial.fetch_financials(request.prospect_id),
        )
        .await
    }

    async fn collect_transcript(
        &self,
        request: &SignalRequest<'_>,
    ) -> (Option<crate::data::signals::TranscriptSignal>, SourceStatus) {
        let text = match request.transcript_text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return (None, SourceStatus::Missing),
        };
        guarded(
            self.transcript.name(),
            request.prospect_id,
            self.fetch_timeout,
            async move { self.transcript.analyze(request.prospect_id, text).await.map(Some) },
        )
        .await
    }

    async fn collect_market(
        &self,
        request: &SignalRequest<'_>,
    ) -> (Option<crate::data::signals::MarketSignal>, SourceStatus) {
        let industry = match request.company.industry.as_deref().map(str::trim) {
            Some(i) if !i.is_empty() => i,
            _ => return (None, SourceStatus::Missing),
        };
        guarded(
            self.market.name(),
            request.prospect_id,
            self.fetch_timeout,
            self.market.fetch_market(industry),
        )
        .await
    }
}

/// Run one fetch under a timeout, folding every failure into "absent"
async fn guarded<T, F>(upstream: &str, prospect_id: &str, timeout: Duration, fetch: F) -> (Option<T>, SourceStatus)
where
    F: Future<Output = SourceResult<Option<T>>>,
{
    match tokio::time::timeout(timeout, fetch).await {
        Ok(Ok(Some(value))) => (Some(value), SourceStatus::Fetched),
        Ok(Ok(None)) => (None, SourceStatus::Missing),
        Ok(Err(e)) => {
            warn!(
                event = events::SOURCE_DEGRADED,
                "⚠️ [COLLECTOR] {} failed for {}: {}", upstream, prospect_id, e
            );
            (None, SourceStatus::Failed)
        }
        Err(_) => {
            warn!(
                event = events::SOURCE_DEGRADED,
                "⚠️ [COLLECTOR] {} timed out for {} after {}ms",
                upstream,
                prospect_id,
                timeout.as_millis()
            );
            (None, SourceStatus::TimedOut)
        }
    }
}
