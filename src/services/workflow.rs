use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::bus::EventBus;
use crate::constants::{events, workflow::MAX_ADVANCE_ATTEMPTS};
use crate::data::store::WorkflowStore;
use crate::data::workflow::{WorkflowProgress, WorkflowStage, WorkflowState};
use crate::error::{EngineError, EngineResult, StoreError};
use crate::events::{Event, StageAdvanced};

/// Per-prospect stage tracker. Every mutation is a versioned
/// read-modify-write against the store; conflicts are retried.
#[derive(Clone)]
pub struct WorkflowTracker {
    store: Arc<dyn WorkflowStore>,
    bus: Option<EventBus>,
}

impl WorkflowTracker {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store, bus: None }
    }

    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Enter `stage` for the prospect, creating the workflow on first use.
    /// Fails unless the transition was durably recorded.
    pub async fn advance(
        &self,
        prospect_id: &str,
        company_name: &str,
        stage: WorkflowStage,
        payload: Option<Value>,
    ) -> EngineResult<WorkflowState> {
        let prospect_id = prospect_id.trim();
        if prospect_id.is_empty() {
            return Err(EngineError::validation("prospect_id is required"));
        }
        let company_name = company_name.trim();

        let mut attempt = 0;
        loop {
            attempt += 1;

            let existing = self.store.get(prospect_id).await.map_err(|e| {
                error!("❌ [WORKFLOW] Failed to load {}: {}", prospect_id, e);
                EngineError::from(e)
            })?;

            let now = Utc::now();
            let (mut state, from) = match existing {
                Some(state) => {
                    let from = state.current_stage;
                    (state, Some(from))
                }
                None => {
                    if company_name.is_empty() {
                        return Err(EngineError::validation(
                            "company_name is required to start a workflow",
                        ));
                    }
                    (WorkflowState::new(prospect_id, company_name, now), None)
                }
            };

            if !company_name.is_empty() {
                state.company_name = company_name.to_string();
            }
            state.enter(stage, payload.clone(), now);
            state.version += 1;

            match self.store.put(prospect_id, state.clone()).await {
                Ok(()) => {
                    let progress = state.progress();
                    info!(
                        event = events::STAGE_ADVANCED,
                        "🧭 [WORKFLOW] {} -> {} ({}% complete, v{})",
                        prospect_id,
                        stage,
                        progress.progress_percent,
                        state.version
                    );
                    self.emit(Event::StageAdvanced(StageAdvanced {
                        prospect_id: prospect_id.to_string(),
                        company_name: state.company_name.clone(),
                        from,
                        to: stage,
                        progress_percent: progress.progress_percent,
                    }));
                    return Ok(state);
                }
                Err(StoreError::VersionConflict { expected, found, .. }) if attempt < MAX_ADVANCE_ATTEMPTS => {
                    warn!(
                        event = events::VERSION_CONFLICT,
                        "🔁 [WORKFLOW] Concurrent write on {} (expected v{}, found v{}); retrying",
                        prospect_id,
                        expected,
                        found
                    );
                }
                Err(e) => {
                    error!("❌ [WORKFLOW] Failed to persist {} -> {}: {}", prospect_id, stage, e);
                    return Err(e.into());
                }
            }
        }
    }

    pub async fn get_state(&self, prospect_id: &str) -> EngineResult<Option<WorkflowState>> {
        Ok(self.store.get(prospect_id.trim()).await?)
    }

    /// Progress report; a prospect with no workflow sits at 0% on the dashboard
    pub async fn get_progress(&self, prospect_id: &str) -> EngineResult<WorkflowProgress> {
        Ok(self
            .get_state(prospect_id)
            .await?
            .map(|s| s.progress())
            .unwrap_or_else(WorkflowProgress::initial))
    }

    pub async fn reset(&self, prospect_id: &str) -> EngineResult<()> {
        let prospect_id = prospect_id.trim();
        if prospect_id.is_empty() {
            return Err(EngineError::validation("prospect_id is required"));
        }

        self.store.delete(prospect_id).await?;
        info!(event = events::WORKFLOW_RESET, "🧹 [WORKFLOW] Reset {}", prospect_id);
        self.emit(Event::WorkflowReset {
            prospect_id: prospect_id.to_string(),
        });
        Ok(())
    }

    fn emit(&self, event: Event) {
        if let Some(bus) = &self.bus {
            bus.emit(event);
        }
    }
}
