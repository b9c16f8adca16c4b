//! Raw signal bundles as they arrive from the collaborators.
//!
//! Every field is optional; the normalizer decides what absence means.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
}

/// Accounting figures for one reporting period
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSignal {
    pub revenue: Option<f64>,
    pub expenses: Option<f64>,
    pub net_income: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
}

impl FinancialSignal {
    pub fn new(revenue: f64, expenses: f64, net_income: f64, assets: f64, liabilities: f64) -> Self {
        Self {
            revenue: Some(revenue),
            expenses: Some(expenses),
            net_income: Some(net_income),
            total_assets: Some(assets),
            total_liabilities: Some(liabilities),
        }
    }

    /// All five statement lines present and finite
    pub fn is_complete(&self) -> bool {
        [
            self.revenue,
            self.expenses,
            self.net_income,
            self.total_assets,
            self.total_liabilities,
        ]
        .iter()
        .all(|v| v.map(f64::is_finite).unwrap_or(false))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfluenceLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionMaker {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub influence: InfluenceLevel,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PainPoint {
    pub category: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveHorizon {
    ShortTerm,
    #[default]
    LongTerm,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessObjective {
    pub description: String,
    #[serde(default)]
    pub horizon: ObjectiveHorizon,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetIndication {
    pub mentioned: bool,
    pub tight: bool,
    pub amount: Option<f64>,
}

/// Structured extraction from a sales call transcript
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSignal {
    pub pain_points: Vec<PainPoint>,
    pub objectives: Vec<BusinessObjective>,
    pub decision_makers: Vec<DecisionMaker>,
    /// Stated timeline, e.g. "we need this before Q3"
    pub timeline: Option<String>,
    pub urgency_phrases: Vec<String>,
    pub pressure_points: Vec<String>,
    pub competitive_alternatives: Vec<String>,
    pub buying_signals: Vec<String>,
    pub objections: Vec<String>,
    pub budget: Option<BudgetIndication>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSentiment {
    Positive,
    Neutral,
    Negative,
}

/// External economic context for the prospect's industry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSignal {
    /// Year-over-year industry growth as a fraction
    pub industry_growth_rate: Option<f64>,
    pub wage_benchmark: Option<f64>,
    pub sentiment: Option<MarketSentiment>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub financial: Option<FinancialSignal>,
    pub transcript: Option<TranscriptSignal>,
    pub market: Option<MarketSignal>,
}

/// How each bundle was obtained for one computation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStatus {
    /// Provided by the caller in the request
    Supplied,
    Fetched,
    /// Nothing to fetch, or the source had no record
    Missing,
    Failed,
    TimedOut,
}

impl SourceStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, SourceStatus::Failed | SourceStatus::TimedOut)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReports {
    pub financial: SourceStatus,
    pub transcript: SourceStatus,
    pub market: SourceStatus,
}
