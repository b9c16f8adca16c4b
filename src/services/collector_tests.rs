//! Unit tests for the concurrent signal collector.

#[cfg(test)]
mod collector_tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use crate::agents::HeuristicTranscriptAnalyst;
    use crate::data::signals::*;
    use crate::error::{SourceError, SourceResult};
    use crate::services::collector::*;
    use crate::sources::memory::{InMemoryFinancialSource, InMemoryMarketSource};
    use crate::sources::{FinancialSource, MarketSource, SignalSources, TranscriptAnalyst};

    struct FailingFinancials;

    #[async_trait]
    impl FinancialSource for FailingFinancials {
        fn name(&self) -> &'static str {
            "failing-financials"
        }
        async fn fetch_financials(&self, _prospect_id: &str) -> SourceResult<Option<FinancialSignal>> {
            Err(SourceError::Http {
                status: 500,
                body: "ledger offline".to_string(),
            })
        }
    }

    /// Answers only after `delay`
    struct SlowMarket {
        delay: Duration,
    }

    #[async_trait]
    impl MarketSource for SlowMarket {
        fn name(&self) -> &'static str {
            "slow-market"
        }
        async fn fetch_market(&self, _industry: &str) -> SourceResult<Option<MarketSignal>> {
            tokio::time::sleep(self.delay).await;
            Ok(Some(MarketSignal::default()))
        }
    }

    struct SlowTranscript {
        delay: Duration,
    }

    #[async_trait]
    impl TranscriptAnalyst for SlowTranscript {
        fn name(&self) -> &'static str {
            "slow-transcript"
        }
        async fn analyze(&self, _prospect_id: &str, _text: &str) -> SourceResult<TranscriptSignal> {
            tokio::time::sleep(self.delay).await;
            Ok(TranscriptSignal::default())
        }
    }

    fn company(industry: Option<&str>) -> CompanyInfo {
        CompanyInfo {
            name: "Acme Bookkeeping".to_string(),
            industry: industry.map(str::to_string),
        }
    }

    fn seeded_sources() -> SignalSources {
        let financial = InMemoryFinancialSource::new();
        financial.insert(
            "p1",
            FinancialSignal::new(1_000_000.0, 600_000.0, 200_000.0, 500_000.0, 150_000.0),
        );
        let market = InMemoryMarketSource::new();
        market.insert(
            "Construction",
            MarketSignal {
                industry_growth_rate: Some(0.04),
                ..Default::default()
            },
        );
        SignalSources {
            financial: Arc::new(financial),
            market: Arc::new(market),
            transcript: Arc::new(HeuristicTranscriptAnalyst),
        }
    }

    #[tokio::test]
    async fn test_collects_all_three_sources() {
        let collector = SignalCollector::new(seeded_sources(), Duration::from_secs(1));
        let company = company(Some("construction"));
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "p1",
                company: &company,
                transcript_text: Some("Can you send pricing? We need this urgently."),
                financial_data: None,
            })
            .await;

        assert_eq!(collected.reports.financial, SourceStatus::Fetched);
        assert_eq!(collected.reports.transcript, SourceStatus::Fetched);
        assert_eq!(collected.reports.market, SourceStatus::Fetched);
        assert_eq!(collected.bundle.financial.unwrap().revenue, Some(1_000_000.0));
        assert_eq!(
            collected.bundle.market.unwrap().industry_growth_rate,
            Some(0.04)
        );
        assert!(!collected.bundle.transcript.unwrap().buying_signals.is_empty());
    }

    #[tokio::test]
    async fn test_supplied_financials_take_precedence() {
        let sources = SignalSources {
            financial: Arc::new(FailingFinancials),
            ..seeded_sources()
        };
        let collector = SignalCollector::new(sources, Duration::from_secs(1));
        let supplied = FinancialSignal::new(10.0, 5.0, 5.0, 10.0, 2.0);
        let company = company(None);
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "p1",
                company: &company,
                transcript_text: None,
                financial_data: Some(&supplied),
            })
            .await;

        assert_eq!(collected.reports.financial, SourceStatus::Supplied);
        assert_eq!(collected.bundle.financial, Some(supplied));
    }

    #[tokio::test]
    async fn test_missing_inputs_are_not_failures() {
        let collector = SignalCollector::new(seeded_sources(), Duration::from_secs(1));
        let company = company(Some("   "));
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "unknown",
                company: &company,
                transcript_text: Some("   "),
                financial_data: None,
            })
            .await;

        assert_eq!(collected.reports.financial, SourceStatus::Missing);
        assert_eq!(collected.reports.transcript, SourceStatus::Missing);
        assert_eq!(collected.reports.market, SourceStatus::Missing);
        assert!(!collected.reports.financial.is_degraded());
        assert_eq!(collected.bundle, SignalBundle::default());
    }

    #[tokio::test]
    async fn test_failed_source_degrades_only_itself() {
        let sources = SignalSources {
            financial: Arc::new(FailingFinancials),
            ..seeded_sources()
        };
        let collector = SignalCollector::new(sources, Duration::from_secs(1));
        let company = company(Some("Construction"));
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "p1",
                company: &company,
                transcript_text: None,
                financial_data: None,
            })
            .await;

        assert_eq!(collected.reports.financial, SourceStatus::Failed);
        assert!(collected.reports.financial.is_degraded());
        assert!(collected.bundle.financial.is_none());
        assert_eq!(collected.reports.market, SourceStatus::Fetched);
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let sources = SignalSources {
            market: Arc::new(SlowMarket {
                delay: Duration::from_secs(5),
            }),
            ..seeded_sources()
        };
        let collector = SignalCollector::new(sources, Duration::from_millis(50));
        let company = company(Some("Construction"));
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "p1",
                company: &company,
                transcript_text: None,
                financial_data: None,
            })
            .await;

        assert_eq!(collected.reports.market, SourceStatus::TimedOut);
        assert!(collected.bundle.market.is_none());
        assert_eq!(collected.reports.financial, SourceStatus::Fetched);
    }

    #[test]
    fn test_source_reports_wire_format() {
        let reports = SourceReports {
            financial: SourceStatus::Supplied,
            transcript: SourceStatus::TimedOut,
            market: SourceStatus::Missing,
        };
        assert_eq!(
            serde_json::to_value(reports).unwrap(),
            serde_json::json!({
                "financial": "supplied",
                "transcript": "timed-out",
                "market": "missing"
            })
        );
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let delay = Duration::from_millis(150);
        let sources = SignalSources {
            market: Arc::new(SlowMarket { delay }),
            transcript: Arc::new(SlowTranscript { delay }),
            ..seeded_sources()
        };
        let collector = SignalCollector::new(sources, Duration::from_secs(2));
        let company = company(Some("Construction"));

        let started = Instant::now();
        let collected = collector
            .collect(&SignalRequest {
                prospect_id: "p1",
                company: &company,
                transcript_text: Some("hello"),
                financial_data: None,
            })
            .await;
        let elapsed = started.elapsed();

        assert_eq!(collected.reports.market, SourceStatus::Fetched);
        assert_eq!(collected.reports.transcript, SourceStatus::Fetched);
        assert!(elapsed < delay * 2, "fetches ran sequentially: {:?}", elapsed);
    }
}
