//! Unit tests for the in-memory persistence gateway.

#[cfg(test)]
mod store_tests {
    use chrono::{Duration, Utc};

    use crate::data::scores::{
        AnalysisType, DataQuality, ReadinessLevel, RecommendationBundle, ScoreSet, ScoredAnalysis,
        UrgencyLevel,
    };
    use crate::data::store::{InMemoryStore, ScoreCache, WorkflowStore};
    use crate::data::workflow::{WorkflowStage, WorkflowState};
    use crate::error::StoreError;

    fn analysis(health: u8, minutes_ago: i64) -> ScoredAnalysis {
        ScoredAnalysis {
            scores: ScoreSet {
                health_score: health,
                closeability_score: 50,
                urgency_level: UrgencyLevel::Low,
                readiness_level: ReadinessLevel::NotReady,
            },
            recommendations: RecommendationBundle::default(),
            data_quality: DataQuality::Partial,
            computed_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn versioned(prospect_id: &str, version: u64) -> WorkflowState {
        let mut state = WorkflowState::new(prospect_id, "Acme", Utc::now());
        state.version = version;
        state
    }

    #[tokio::test]
    async fn test_get_missing_workflow() {
        let store = InMemoryStore::new();
        assert!(store.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemoryStore::new();
        store.put("p1", versioned("p1", 1)).await.unwrap();

        let loaded = store.get("p1").await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.current_stage, WorkflowStage::Dashboard);
        assert_eq!(store.workflow_count(), 1);

        store.delete("p1").await.unwrap();
        assert!(store.get("p1").await.unwrap().is_none());

        // Deleting again is fine
        store.delete("p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_requires_next_version() {
        let store = InMemoryStore::new();
        store.put("p1", versioned("p1", 1)).await.unwrap();
        store.put("p1", versioned("p1", 2)).await.unwrap();

        // Stale writer still holding v1 tries to write v2 again
        let err = store.put("p1", versioned("p1", 2)).await.unwrap_err();
        match err {
            StoreError::VersionConflict {
                prospect_id,
                expected,
                found,
            } => {
                assert_eq!(prospect_id, "p1");
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("expected version conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_put_must_be_version_one() {
        let store = InMemoryStore::new();
        assert!(store.put("p1", versioned("p1", 0)).await.is_err());
        assert!(store.put("p1", versioned("p1", 3)).await.is_err());
        assert!(store.put("p1", versioned("p1", 1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_score_upsert_keeps_id() {
        let store = InMemoryStore::new();
        let first = store
            .upsert_latest_score("p1", AnalysisType::Comprehensive, analysis(60, 5))
            .await
            .unwrap();
        let second = store
            .upsert_latest_score("p1", AnalysisType::Comprehensive, analysis(70, 0))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.score_count(), 1);

        let cached = store
            .get_latest_score("p1", Some(AnalysisType::Comprehensive))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.analysis.scores.health_score, 70);
    }

    #[tokio::test]
    async fn test_latest_score_across_types() {
        let store = InMemoryStore::new();
        store
            .upsert_latest_score("p1", AnalysisType::FinancialHealth, analysis(40, 10))
            .await
            .unwrap();
        store
            .upsert_latest_score("p1", AnalysisType::DealIntelligence, analysis(80, 1))
            .await
            .unwrap();
        store
            .upsert_latest_score("p2", AnalysisType::Comprehensive, analysis(90, 0))
            .await
            .unwrap();

        let latest = store.get_latest_score("p1", None).await.unwrap().unwrap();
        assert_eq!(latest.analysis_type, AnalysisType::DealIntelligence);
        assert_eq!(latest.prospect_id, "p1");

        assert!(store
            .get_latest_score("p1", Some(AnalysisType::Comprehensive))
            .await
            .unwrap()
            .is_none());
        assert!(store.get_latest_score("p3", None).await.unwrap().is_none());
    }
}
