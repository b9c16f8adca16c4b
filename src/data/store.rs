//! Persistence gateway: the two storage shapes the engine depends on, plus
//! an in-memory implementation keyed by prospect id.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::data::scores::{AnalysisType, ScoredAnalysis};
use crate::data::workflow::WorkflowState;
use crate::error::{StoreError, StoreResult};

/// Durable workflow state, one record per prospect.
///
/// `put` is a compare-and-swap on `WorkflowState::version`: it succeeds only
/// when the stored version is `state.version - 1` (or nothing is stored and
/// `state.version == 1`).
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn get(&self, prospect_id: &str) -> StoreResult<Option<WorkflowState>>;
    async fn put(&self, prospect_id: &str, state: WorkflowState) -> StoreResult<()>;
    async fn delete(&self, prospect_id: &str) -> StoreResult<()>;
}

/// Latest computed result per prospect and analysis type
#[async_trait]
pub trait ScoreCache: Send + Sync {
    /// Returns the id assigned to the stored record
    async fn upsert_latest_score(
        &self,
        prospect_id: &str,
        analysis_type: AnalysisType,
        analysis: ScoredAnalysis,
    ) -> StoreResult<String>;

    /// With no type, the most recently computed record of any type
    async fn get_latest_score(
        &self,
        prospect_id: &str,
        analysis_type: Option<AnalysisType>,
    ) -> StoreResult<Option<CachedScore>>;
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CachedScore {
    pub id: String,
    pub prospect_id: String,
    pub analysis_type: AnalysisType,
    pub analysis: ScoredAnalysis,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    workflows: Arc<DashMap<String, WorkflowState>>,
    scores: Arc<DashMap<(String, AnalysisType), CachedScore>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workflow_count(&self) -> usize {
        self.workflows.len()
    }

    pub fn score_count(&self) -> usize {
        self.scores.len()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn get(&self, prospect_id: &str) -> StoreResult<Option<WorkflowState>> {
        Ok(self.workflows.get(prospect_id).map(|s| s.value().clone()))
    }

    async fn put(&self, prospect_id: &str, state: WorkflowState) -> StoreResult<()> {
        let expected = state.version.saturating_sub(1);

        // The entry guard holds the shard lock, so check-then-write is atomic per key
        let entry = self.workflows.entry(prospect_id.to_string());
        let found = match &entry {
            dashmap::mapref::entry::Entry::Occupied(o) => o.get().version,
            dashmap::mapref::entry::Entry::Vacant(_) => 0,
        };
        if state.version == 0 || found != expected {
            return Err(StoreError::VersionConflict {
                prospect_id: prospect_id.to_string(),
                expected,
                found,
            });
        }

        debug!("💾 [STORE] Writing workflow {} v{}", prospect_id, state.version);
        entry.insert(state);
        Ok(())
    }

    async fn delete(&self, prospect_id: &str) -> StoreResult<()> {
        self.workflows.remove(prospect_id);
        Ok(())
    }
}

#[async_trait]
impl ScoreCache for InMemoryStore {
    async fn upsert_latest_score(
        &self,
        prospect_id: &str,
        analysis_type: AnalysisType,
        analysis: ScoredAnalysis,
    ) -> StoreResult<String> {
        let key = (prospect_id.to_string(), analysis_type);
        let id = match self.scores.get(&key) {
            Some(existing) => existing.id.clone(),
            None => Uuid::new_v4().to_string(),
        };

        self.scores.insert(
            key,
            CachedScore {
                id: id.clone(),
                prospect_id: prospect_id.to_string(),
                analysis_type,
                analysis,
            },
        );
        Ok(id)
    }

    async fn get_latest_score(
        &self,
        prospect_id: &str,
        analysis_type: Option<AnalysisType>,
    ) -> StoreResult<Option<CachedScore>> {
        if let Some(analysis_type) = analysis_type {
            let key = (prospect_id.to_string(), analysis_type);
            return Ok(self.scores.get(&key).map(|c| c.value().clone()));
        }

        let latest = self
            .scores
            .iter()
            .filter(|c| c.prospect_id == prospect_id)
            .max_by_key(|c| c.analysis.computed_at)
            .map(|c| c.value().clone());
        Ok(latest)
    }
}
