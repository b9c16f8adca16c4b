//! Unit tests for the compute-intelligence pipeline.

#[cfg(test)]
mod intelligence_tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::bus::EventBus;
    use crate::data::scores::*;
    use crate::data::signals::FinancialSignal;
    use crate::data::store::{CachedScore, InMemoryStore, ScoreCache};
    use crate::error::{EngineError, StoreError, StoreResult};
    use crate::events::Event;
    use crate::data::signals::SourceStatus;
    use crate::services::collector::SignalCollector;
    use crate::services::intelligence::*;
    use crate::services::scoring::ScoringEngine;
    use crate::sources::SignalSources;

    const BUYING_CALL: &str = "Can you send over pricing. What are the next steps to get started? \
        Please share a proposal. Our CFO joined the call. We need this urgently.";

    struct UnavailableCache;

    #[async_trait]
    impl ScoreCache for UnavailableCache {
        async fn upsert_latest_score(
            &self,
            _prospect_id: &str,
            _analysis_type: AnalysisType,
            _analysis: ScoredAnalysis,
        ) -> StoreResult<String> {
            Err(StoreError::Backend("cache offline".to_string()))
        }

        async fn get_latest_score(
            &self,
            _prospect_id: &str,
            _analysis_type: Option<AnalysisType>,
        ) -> StoreResult<Option<CachedScore>> {
            Err(StoreError::Backend("cache offline".to_string()))
        }
    }

    fn engine_with(cache: Arc<dyn ScoreCache>) -> IntelligenceEngine {
        let collector = SignalCollector::new(SignalSources::offline(), Duration::from_secs(1));
        IntelligenceEngine::new(collector, ScoringEngine::default(), cache)
    }

    fn scenario_request() -> IntelligenceRequest {
        IntelligenceRequest {
            financial_data: Some(FinancialSignal::new(
                1_000_000.0,
                600_000.0,
                200_000.0,
                500_000.0,
                150_000.0,
            )),
            ..IntelligenceRequest::new("p1", "Acme Bookkeeping")
        }
    }

    #[tokio::test]
    async fn test_compute_with_supplied_financials() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone());

        let report = engine.compute(&scenario_request()).await.unwrap();

        assert_eq!(report.analysis_type, AnalysisType::Comprehensive);
        assert_eq!(report.scores.health_score, 67);
        assert_eq!(report.scores.closeability_score, 50);
        assert_eq!(report.scores.urgency_level, UrgencyLevel::Low);
        assert_eq!(report.scores.readiness_level, ReadinessLevel::NotReady);
        assert_eq!(report.data_quality, DataQuality::Partial);
        assert_eq!(report.sources.financial, SourceStatus::Supplied);
        assert_eq!(report.sources.transcript, SourceStatus::Missing);
        assert!(report.record_id.is_some());
        assert_eq!(store.score_count(), 1);
    }

    #[tokio::test]
    async fn test_compute_from_transcript_text() {
        let engine = engine_with(Arc::new(InMemoryStore::new()));
        let request = IntelligenceRequest {
            transcript_text: Some(BUYING_CALL.to_string()),
            ..scenario_request()
        };

        let report = engine.compute(&request).await.unwrap();

        assert_eq!(report.scores.closeability_score, 100);
        assert_eq!(report.scores.urgency_level, UrgencyLevel::High);
        assert_eq!(report.scores.readiness_level, ReadinessLevel::Ready);
        assert_eq!(report.data_quality, DataQuality::Live);
        assert!(report.recommendations.next_steps[0].starts_with("Emphasize"));
    }

    #[tokio::test]
    async fn test_transcript_only_is_estimated() {
        let engine = engine_with(Arc::new(InMemoryStore::new()));
        let request = IntelligenceRequest {
            transcript_text: Some("We are hoping to fix our cash flow reporting.".to_string()),
            ..IntelligenceRequest::new("p2", "Beta LLC")
        };

        let report = engine.compute(&request).await.unwrap();

        assert_eq!(report.data_quality, DataQuality::Estimated);
        assert_eq!(report.scores.health_score, 50);
        assert_eq!(report.recommendations.opportunities.len(), 3);
        assert_eq!(report.sources.financial, SourceStatus::Missing);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let engine = engine_with(Arc::new(InMemoryStore::new()));

        let missing_id = IntelligenceRequest::new("  ", "Acme");
        assert!(matches!(
            engine.compute(&missing_id).await.unwrap_err(),
            EngineError::Validation(_)
        ));

        let missing_name = IntelligenceRequest::new("p1", "");
        assert!(matches!(
            engine.compute(&missing_name).await.unwrap_err(),
            EngineError::Validation(_)
        ));

        let bad_type = IntelligenceRequest {
            analysis_type: Some("horoscope".to_string()),
            ..scenario_request()
        };
        assert!(matches!(
            engine.compute(&bad_type).await.unwrap_err(),
            EngineError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_cache_failure_is_not_fatal() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let engine = engine_with(Arc::new(UnavailableCache)).with_bus(bus);

        let report = engine.compute(&scenario_request()).await.unwrap();
        assert_eq!(report.record_id, None);
        assert_eq!(report.scores.health_score, 67);

        match rx.recv().await.unwrap() {
            Event::IntelligenceComputed(e) => {
                assert_eq!(e.prospect_id, "p1");
                assert!(!e.cached);
                assert_eq!(e.scores, report.scores);
            }
            other => panic!("unexpected event {:?}", other),
        }

        assert!(matches!(
            engine.latest_score("p1", None).await.unwrap_err(),
            EngineError::Persistence(_)
        ));
    }

    #[tokio::test]
    async fn test_recompute_replaces_cached_score() {
        let engine = engine_with(Arc::new(InMemoryStore::new()));

        let first = engine.compute(&scenario_request()).await.unwrap();
        let second = engine
            .compute(&IntelligenceRequest {
                transcript_text: Some(BUYING_CALL.to_string()),
                ..scenario_request()
            })
            .await
            .unwrap();

        assert_eq!(first.record_id, second.record_id);
        let cached = engine.latest_score("p1", Some("comprehensive")).await.unwrap().unwrap();
        assert_eq!(cached.analysis.scores, second.scores);
        assert_eq!(cached.analysis, second.to_scored_analysis());
    }

    #[tokio::test]
    async fn test_latest_score_by_type() {
        let engine = engine_with(Arc::new(InMemoryStore::new()));

        engine.compute(&scenario_request()).await.unwrap();
        let deal = engine
            .compute(&IntelligenceRequest {
                analysis_type: Some("Deal-Intelligence".to_string()),
                ..scenario_request()
            })
            .await
            .unwrap();
        assert_eq!(deal.analysis_type, AnalysisType::DealIntelligence);

        let latest = engine.latest_score("p1", None).await.unwrap().unwrap();
        assert_eq!(latest.analysis_type, AnalysisType::DealIntelligence);

        assert!(engine
            .latest_score("p1", Some("financial-health"))
            .await
            .unwrap()
            .is_none());
        assert!(engine.latest_score("other", None).await.unwrap().is_none());
        assert!(matches!(
            engine.latest_score("p1", Some("nope")).await.unwrap_err(),
            EngineError::Validation(_)
        ));
        assert!(matches!(
            engine.latest_score("", None).await.unwrap_err(),
            EngineError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_analysis_type_only_selects_cache_slot() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone());

        let mut reports = Vec::new();
        for analysis_type in AnalysisType::ALL {
            let report = engine
                .compute(&IntelligenceRequest {
                    analysis_type: Some(analysis_type.as_str().to_string()),
                    transcript_text: Some(BUYING_CALL.to_string()),
                    ..scenario_request()
                })
                .await
                .unwrap();
            assert_eq!(report.analysis_type, analysis_type);
            reports.push(report);
        }

        assert!(reports.windows(2).all(|w| w[0].scores == w[1].scores
            && w[0].recommendations == w[1].recommendations));
        assert_eq!(store.score_count(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_cached_score_is_an_invariant_violation() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone());
        let report = engine.compute(&scenario_request()).await.unwrap();
        assert!(report.scores.check_bounds().is_ok());

        let mut corrupt = report.to_scored_analysis();
        corrupt.scores.health_score = 130;
        store
            .upsert_latest_score("p1", AnalysisType::Comprehensive, corrupt)
            .await
            .unwrap();

        assert!(matches!(
            engine.latest_score("p1", None).await.unwrap_err(),
            EngineError::InvariantViolation(_)
        ));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: IntelligenceRequest = serde_json::from_str(
            r#"{"prospect_id": "p9", "company": {"name": "Gamma"}}"#,
        )
        .unwrap();
        assert_eq!(request.validate().unwrap(), AnalysisType::Comprehensive);
        assert!(request.transcript_text.is_none());
        assert!(request.company.industry.is_none());
    }
}
