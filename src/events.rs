use serde::{Deserialize, Serialize};

use crate::data::scores::{AnalysisType, DataQuality, ScoreSet};
use crate::data::workflow::WorkflowStage;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceComputed {
    pub prospect_id: String,
    pub analysis_type: AnalysisType,
    pub scores: ScoreSet,
    pub data_quality: DataQuality,
    pub cached: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageAdvanced {
    pub prospect_id: String,
    pub company_name: String,
    /// `None` when this advance created the workflow
    pub from: Option<WorkflowStage>,
    pub to: WorkflowStage,
    pub progress_percent: u8,
}

// Global Event Enum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    IntelligenceComputed(IntelligenceComputed),
    StageAdvanced(StageAdvanced),
    WorkflowReset { prospect_id: String },
}

impl Event {
    pub fn prospect_id(&self) -> &str {
        match self {
            Event::IntelligenceComputed(e) => &e.prospect_id,
            Event::StageAdvanced(e) => &e.prospect_id,
            Event::WorkflowReset { prospect_id } => prospect_id,
        }
    }
}
