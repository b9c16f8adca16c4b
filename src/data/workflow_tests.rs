//! Unit tests for workflow stage ordering and state bookkeeping.

#[cfg(test)]
mod workflow_tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::data::workflow::{WorkflowProgress, WorkflowStage, WorkflowState};

    #[test]
    fn test_stage_order_and_next() {
        let names: Vec<&str> = WorkflowStage::ORDER.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "dashboard",
                "data-extraction",
                "call-transcripts",
                "financial-analysis",
                "report-generation",
                "audit-deck"
            ]
        );

        assert_eq!(WorkflowStage::Dashboard.next(), Some(WorkflowStage::DataExtraction));
        assert_eq!(WorkflowStage::ReportGeneration.next(), Some(WorkflowStage::AuditDeck));
        assert_eq!(WorkflowStage::AuditDeck.next(), None);
        assert!(WorkflowStage::AuditDeck.is_last());
        assert_eq!(WorkflowStage::FinancialAnalysis.index(), 3);
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!(
            "financial-analysis".parse::<WorkflowStage>().unwrap(),
            WorkflowStage::FinancialAnalysis
        );
        assert_eq!(" Audit-Deck ".parse::<WorkflowStage>().unwrap(), WorkflowStage::AuditDeck);
        assert!("closing".parse::<WorkflowStage>().is_err());
    }

    #[test]
    fn test_stage_serde_matches_display() {
        for stage in WorkflowStage::ORDER {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, json!(stage.to_string()));
        }
    }

    #[test]
    fn test_new_state_is_on_dashboard() {
        let now = Utc::now();
        let state = WorkflowState::new("p1", "Acme", now);

        assert_eq!(state.current_stage, WorkflowStage::Dashboard);
        assert!(state.completed_stages.is_empty());
        assert_eq!(state.timestamps.started, now);
        assert_eq!(state.timestamps.stages.get(&WorkflowStage::Dashboard), Some(&now));
        assert_eq!(state.version, 0);
    }

    #[test]
    fn test_enter_marks_previous_complete() {
        let t0 = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", t0);

        state.enter(WorkflowStage::DataExtraction, None, t0 + Duration::seconds(1));
        assert_eq!(state.current_stage, WorkflowStage::DataExtraction);
        assert!(state.completed_stages.contains(&WorkflowStage::Dashboard));
        assert_eq!(state.completed_stages.len(), 1);
    }

    #[test]
    fn test_reentering_same_stage_only_touches_time_and_payload() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(5);
        let mut state = WorkflowState::new("p1", "Acme", t0);

        state.enter(WorkflowStage::Dashboard, Some(json!({"a": 1})), t1);
        state.enter(WorkflowStage::Dashboard, Some(json!({"a": 2})), t1);

        assert!(state.completed_stages.is_empty());
        assert_eq!(state.timestamps.stages[&WorkflowStage::Dashboard], t1);
        assert_eq!(state.timestamps.last_updated, t1);
        assert_eq!(state.timestamps.started, t0);
        assert_eq!(state.stage_payloads[&WorkflowStage::Dashboard], json!({"a": 2}));
    }

    #[test]
    fn test_going_back_keeps_later_completions() {
        let now = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", now);
        state.enter(WorkflowStage::DataExtraction, None, now);
        state.enter(WorkflowStage::CallTranscripts, None, now);
        state.enter(WorkflowStage::FinancialAnalysis, None, now);
        assert_eq!(state.completed_stages.len(), 3);

        state.enter(WorkflowStage::DataExtraction, None, now);
        assert_eq!(state.current_stage, WorkflowStage::DataExtraction);
        // FinancialAnalysis was left, so it is now complete as well
        assert_eq!(state.completed_stages.len(), 4);
        assert!(state.completed_stages.contains(&WorkflowStage::CallTranscripts));
    }

    #[test]
    fn test_payload_overwrites_only_its_stage() {
        let now = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", now);
        state.enter(WorkflowStage::DataExtraction, Some(json!("rows")), now);
        state.enter(WorkflowStage::CallTranscripts, Some(json!("calls")), now);
        state.enter(WorkflowStage::CallTranscripts, None, now);

        assert_eq!(state.stage_payloads[&WorkflowStage::DataExtraction], json!("rows"));
        assert_eq!(state.stage_payloads[&WorkflowStage::CallTranscripts], json!("calls"));
    }

    #[test]
    fn test_progress_initial_and_complete() {
        let initial = WorkflowProgress::initial();
        assert_eq!(initial.current_stage, WorkflowStage::Dashboard);
        assert_eq!(initial.progress_percent, 0);
        assert_eq!(initial.next_stage, Some(WorkflowStage::DataExtraction));

        let now = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", now);
        for stage in WorkflowStage::ORDER.iter().skip(1) {
            state.enter(*stage, None, now);
        }
        let progress = state.progress();
        assert_eq!(progress.current_stage, WorkflowStage::AuditDeck);
        assert_eq!(progress.completed_stages.len(), 6);
        assert_eq!(progress.progress_percent, 100);
        assert_eq!(progress.next_stage, None);
    }

    #[test]
    fn test_progress_rounds() {
        let now = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", now);
        state.enter(WorkflowStage::DataExtraction, None, now);
        assert_eq!(state.progress().progress_percent, 17);

        state.enter(WorkflowStage::CallTranscripts, None, now);
        assert_eq!(state.progress().progress_percent, 33);
    }

    #[test]
    fn test_state_json_roundtrip_with_stage_keys() {
        let now = Utc::now();
        let mut state = WorkflowState::new("p1", "Acme", now);
        state.enter(WorkflowStage::FinancialAnalysis, Some(json!({"health_score": 67})), now);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["current_stage"], "financial-analysis");
        assert_eq!(json["stage_payloads"]["financial-analysis"]["health_score"], 67);
        assert_eq!(json["completed_stages"], json!(["dashboard"]));

        let back: WorkflowState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
