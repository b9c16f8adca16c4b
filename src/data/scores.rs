use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::data::signals::SourceReports;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadinessLevel {
    NotReady,
    Exploring,
    Evaluating,
    Ready,
}

impl ReadinessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessLevel::NotReady => "not-ready",
            ReadinessLevel::Exploring => "exploring",
            ReadinessLevel::Evaluating => "evaluating",
            ReadinessLevel::Ready => "ready",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    /// Complete financials plus a transcript
    Live,
    /// Some real data, some defaults
    Partial,
    /// No financial bundle; financial figures are neutral estimates
    Estimated,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Live => "live",
            DataQuality::Partial => "partial",
            DataQuality::Estimated => "estimated",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub health_score: u8,
    pub closeability_score: u8,
    pub urgency_level: UrgencyLevel,
    pub readiness_level: ReadinessLevel,
}

impl ScoreSet {
    /// Scores read back from storage are not trusted to be in [0,100]
    pub fn check_bounds(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("health_score", self.health_score),
            ("closeability_score", self.closeability_score),
        ] {
            if value > 100 {
                return Err(EngineError::InvariantViolation(format!(
                    "{} out of bounds: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub category: String,
    pub potential_value: f64,
    pub difficulty: Difficulty,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub next_steps: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<OpportunityRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    FinancialHealth,
    DealIntelligence,
    #[default]
    Comprehensive,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [
        AnalysisType::FinancialHealth,
        AnalysisType::DealIntelligence,
        AnalysisType::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::FinancialHealth => "financial-health",
            AnalysisType::DealIntelligence => "deal-intelligence",
            AnalysisType::Comprehensive => "comprehensive",
        }
    }

    /// Parse an optional selector; absent means `Comprehensive`
    pub fn parse_selector(selector: Option<&str>) -> Result<Self, EngineError> {
        match selector.map(str::trim) {
            None | Some("") => Ok(AnalysisType::default()),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::validation(format!("unknown analysis type '{}'", s)))
    }
}

/// What the score cache keeps per prospect and analysis type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnalysis {
    pub scores: ScoreSet,
    pub recommendations: RecommendationBundle,
    pub data_quality: DataQuality,
    pub computed_at: DateTime<Utc>,
}

/// Result of one `compute` call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceReport {
    pub prospect_id: String,
    pub company_name: String,
    pub analysis_type: AnalysisType,
    pub scores: ScoreSet,
    pub recommendations: RecommendationBundle,
    pub data_quality: DataQuality,
    pub sources: SourceReports,
    pub generated_at: DateTime<Utc>,
    /// Score cache id; `None` when caching failed
    pub record_id: Option<String>,
}

impl IntelligenceReport {
    pub fn to_scored_analysis(&self) -> ScoredAnalysis {
        ScoredAnalysis {
            scores: self.scores,
            recommendations: self.recommendations.clone(),
            data_quality: self.data_quality,
            computed_at: self.generated_at,
        }
    }
}
