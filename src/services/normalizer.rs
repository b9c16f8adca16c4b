//! Turns raw, partially-missing signal bundles into the canonical numeric
//! set the scoring engine reads. Every fallback decision lives here.

use serde::{Deserialize, Serialize};

use crate::constants::neutral;
use crate::data::scores::DataQuality;
use crate::data::signals::{
    InfluenceLevel, MarketSignal, ObjectiveHorizon, SignalBundle, TranscriptSignal,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFacts {
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub profit_margin: f64,
    pub current_ratio: f64,
    pub debt_to_asset_ratio: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFacts {
    /// Timeline text plus urgency phrases, lower-cased
    pub urgency_text: String,
    pub pain_point_categories: Vec<String>,
    pub buying_signals: usize,
    pub objections: usize,
    pub decision_makers: usize,
    pub high_influence_decision_makers: usize,
    pub competitive_alternatives: usize,
    pub pressure_points: usize,
    pub short_term_objectives: usize,
    pub budget_mentioned: bool,
    pub budget_tight: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketFacts {
    pub industry_growth_rate: f64,
    pub negative_sentiment: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSignals {
    pub financial: FinancialFacts,
    /// No financial bundle at all; figures above are neutral constants
    pub financial_estimated: bool,
    pub transcript: TranscriptFacts,
    pub has_transcript: bool,
    /// `None` when no market bundle arrived; adjustments then contribute zero
    pub market: Option<MarketFacts>,
    pub data_quality: DataQuality,
}

pub fn normalize(bundle: &SignalBundle) -> CanonicalSignals {
    let (financial, financial_estimated, financial_complete) = match &bundle.financial {
        None => (estimated_financials(), true, false),
        Some(f) => {
            let revenue = amount(f.revenue);
            let net_income = amount(f.net_income);
            let profit_margin = if revenue > 0.0 { net_income / revenue } else { 0.0 };

            let assets = finite(f.total_assets);
            let liabilities = finite(f.total_liabilities);
            let (current_ratio, debt_to_asset_ratio) = match (assets, liabilities) {
                (Some(a), Some(l)) => (
                    if l > 0.0 { a / l } else { neutral::CURRENT_RATIO },
                    if a > 0.0 { l / a } else { 0.0 },
                ),
                _ => (neutral::CURRENT_RATIO, neutral::DEBT_TO_ASSET_RATIO),
            };

            let facts = FinancialFacts {
                revenue,
                expenses: amount(f.expenses),
                net_income,
                total_assets: assets.unwrap_or(0.0),
                total_liabilities: liabilities.unwrap_or(0.0),
                profit_margin,
                current_ratio,
                debt_to_asset_ratio,
            };
            (facts, false, f.is_complete())
        }
    };

    let transcript = bundle
        .transcript
        .as_ref()
        .map(transcript_facts)
        .unwrap_or_default();
    let has_transcript = bundle.transcript.is_some();

    let data_quality = if financial_estimated {
        DataQuality::Estimated
    } else if financial_complete && has_transcript {
        DataQuality::Live
    } else {
        DataQuality::Partial
    };

    CanonicalSignals {
        financial,
        financial_estimated,
        transcript,
        has_transcript,
        market: bundle.market.as_ref().map(market_facts),
        data_quality,
    }
}

fn estimated_financials() -> FinancialFacts {
    FinancialFacts {
        profit_margin: neutral::PROFIT_MARGIN,
        current_ratio: neutral::CURRENT_RATIO,
        debt_to_asset_ratio: neutral::DEBT_TO_ASSET_RATIO,
        ..FinancialFacts::default()
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn amount(v: Option<f64>) -> f64 {
    finite(v).unwrap_or(0.0)
}

fn transcript_facts(t: &TranscriptSignal) -> TranscriptFacts {
    let mut urgency_text = t.timeline.clone().unwrap_or_default();
    for phrase in &t.urgency_phrases {
        if !urgency_text.is_empty() {
            urgency_text.push(' ');
        }
        urgency_text.push_str(phrase);
    }

    let mut categories: Vec<String> = Vec::new();
    for p in &t.pain_points {
        let category = p.category.trim().to_lowercase();
        if !category.is_empty() && !categories.contains(&category) {
            categories.push(category);
        }
    }

    let budget = t.budget.clone().unwrap_or_default();

    TranscriptFacts {
        urgency_text: urgency_text.to_lowercase(),
        pain_point_categories: categories,
        buying_signals: t.buying_signals.len(),
        objections: t.objections.len(),
        decision_makers: t.decision_makers.len(),
        high_influence_decision_makers: t
            .decision_makers
            .iter()
            .filter(|d| d.influence == InfluenceLevel::High)
            .count(),
        competitive_alternatives: t.competitive_alternatives.len(),
        pressure_points: t.pressure_points.len(),
        short_term_objectives: t
            .objectives
            .iter()
            .filter(|o| o.horizon == ObjectiveHorizon::ShortTerm)
            .count(),
        budget_mentioned: budget.mentioned,
        budget_tight: budget.tight,
    }
}

fn market_facts(m: &MarketSignal) -> MarketFacts {
    MarketFacts {
        industry_growth_rate: amount(m.industry_growth_rate),
        negative_sentiment: matches!(
            m.sentiment,
            Some(crate::data::signals::MarketSentiment::Negative)
        ),
    }
}
