use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// The six sales stages, in pipeline order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStage {
    Dashboard,
    DataExtraction,
    CallTranscripts,
    FinancialAnalysis,
    ReportGeneration,
    AuditDeck,
}

impl WorkflowStage {
    pub const ORDER: [WorkflowStage; 6] = [
        WorkflowStage::Dashboard,
        WorkflowStage::DataExtraction,
        WorkflowStage::CallTranscripts,
        WorkflowStage::FinancialAnalysis,
        WorkflowStage::ReportGeneration,
        WorkflowStage::AuditDeck,
    ];

    pub const COUNT: usize = Self::ORDER.len();

    pub fn index(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    /// Following stage, `None` for the last one
    pub fn next(&self) -> Option<WorkflowStage> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Dashboard => "dashboard",
            WorkflowStage::DataExtraction => "data-extraction",
            WorkflowStage::CallTranscripts => "call-transcripts",
            WorkflowStage::FinancialAnalysis => "financial-analysis",
            WorkflowStage::ReportGeneration => "report-generation",
            WorkflowStage::AuditDeck => "audit-deck",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStage {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::validation(format!("unknown workflow stage '{}'", s)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTimestamps {
    pub started: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Last time each stage was entered
    pub stages: BTreeMap<WorkflowStage, DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub prospect_id: String,
    pub company_name: String,
    pub current_stage: WorkflowStage,
    pub completed_stages: BTreeSet<WorkflowStage>,
    pub stage_payloads: BTreeMap<WorkflowStage, Value>,
    pub timestamps: WorkflowTimestamps,
    /// Bumped on every successful write
    pub version: u64,
}

impl WorkflowState {
    /// Fresh state parked on the dashboard; not yet persisted (version 0)
    pub fn new(prospect_id: &str, company_name: &str, now: DateTime<Utc>) -> Self {
        let mut stages = BTreeMap::new();
        stages.insert(WorkflowStage::Dashboard, now);
        Self {
            prospect_id: prospect_id.to_string(),
            company_name: company_name.to_string(),
            current_stage: WorkflowStage::Dashboard,
            completed_stages: BTreeSet::new(),
            stage_payloads: BTreeMap::new(),
            timestamps: WorkflowTimestamps {
                started: now,
                last_updated: now,
                stages,
            },
            version: 0,
        }
    }

    /// Move to `stage`, marking the stage being left as complete.
    /// The terminal stage is never left, so reaching it completes it too.
    pub fn enter(&mut self, stage: WorkflowStage, payload: Option<Value>, now: DateTime<Utc>) {
        if self.current_stage != stage {
            self.completed_stages.insert(self.current_stage);
        }
        if stage.is_last() {
            self.completed_stages.insert(stage);
        }
        self.current_stage = stage;
        self.timestamps.stages.insert(stage, now);
        self.timestamps.last_updated = now;

        if let Some(payload) = payload {
            self.stage_payloads.insert(stage, payload);
        }
    }

    pub fn progress(&self) -> WorkflowProgress {
        WorkflowProgress::from_parts(self.current_stage, &self.completed_stages)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowProgress {
    pub current_stage: WorkflowStage,
    pub completed_stages: Vec<WorkflowStage>,
    pub progress_percent: u8,
    pub next_stage: Option<WorkflowStage>,
}

impl WorkflowProgress {
    pub fn from_parts(current: WorkflowStage, completed: &BTreeSet<WorkflowStage>) -> Self {
        let percent = (100.0 * completed.len() as f64 / WorkflowStage::COUNT as f64).round();
        Self {
            current_stage: current,
            completed_stages: completed.iter().copied().collect(),
            progress_percent: percent.clamp(0.0, 100.0) as u8,
            next_stage: current.next(),
        }
    }

    /// Progress for a prospect that has never been advanced
    pub fn initial() -> Self {
        Self::from_parts(WorkflowStage::Dashboard, &BTreeSet::new())
    }
}
