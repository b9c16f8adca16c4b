//! Recommendation generator. Pure and deterministic: branch order below is
//! the output order.

use crate::constants::recommendations as rec;
use crate::data::scores::{
    Difficulty, OpportunityRecord, RecommendationBundle, ScoreSet, UrgencyLevel,
};
use crate::services::normalizer::CanonicalSignals;

pub const NO_MAJOR_RISKS: &str = "No major risk factors identified";
pub const FINANCIALS_UNAVAILABLE: &str =
    "Financials unavailable: health is an estimate until statements are collected";

pub fn recommend(signals: &CanonicalSignals, scores: &ScoreSet) -> RecommendationBundle {
    RecommendationBundle {
        next_steps: next_steps(scores),
        risk_factors: risk_factors(signals, scores),
        opportunities: opportunities(signals),
    }
}

pub fn next_steps(scores: &ScoreSet) -> Vec<String> {
    let mut steps = Vec::new();

    if scores.urgency_level == UrgencyLevel::High {
        steps.push(
            "Emphasize the immediate financial risk of inaction in the next conversation"
                .to_string(),
        );
    }

    if scores.closeability_score >= rec::HIGH_CLOSEABILITY {
        steps.push(
            "High priority: schedule a proposal presentation with the decision makers".to_string(),
        );
        steps.push("Prepare customized materials built on the prospect's own numbers".to_string());
    } else if scores.closeability_score >= rec::MID_CLOSEABILITY {
        steps.push("Address open objections with targeted case studies".to_string());
        steps.push("Schedule a follow-up meeting with more discovery".to_string());
    } else {
        steps.push("Run a discovery session to map pain points and objectives".to_string());
        steps.push("Share educational content on financial visibility".to_string());
    }

    steps
}

pub fn risk_factors(signals: &CanonicalSignals, scores: &ScoreSet) -> Vec<String> {
    let f = &signals.financial;
    let mut risks = Vec::new();

    // Neutral placeholders are not figures worth quoting back
    if signals.financial_estimated {
        risks.push(FINANCIALS_UNAVAILABLE.to_string());
    } else {
        if scores.health_score < rec::WEAK_HEALTH {
            risks.push("Low profitability: margins leave little room for error".to_string());
        }
        if f.debt_to_asset_ratio > rec::HIGH_LEVERAGE_RATIO {
            risks.push(format!(
                "High leverage: liabilities are {:.0}% of assets",
                f.debt_to_asset_ratio * 100.0
            ));
        }
        if f.current_ratio < rec::LOW_LIQUIDITY_RATIO {
            risks.push(format!(
                "Liquidity: current ratio of {:.2} may strain short-term obligations",
                f.current_ratio
            ));
        }
    }
    if let Some(market) = &signals.market {
        if market.industry_growth_rate < 0.0 || market.negative_sentiment {
            risks.push("Market headwinds: the industry is contracting".to_string());
        }
    }

    if risks.is_empty() {
        risks.push(NO_MAJOR_RISKS.to_string());
    }
    risks
}

/// Standing service offerings scaled to the prospect, plus conditional findings
pub fn opportunities(signals: &CanonicalSignals) -> Vec<OpportunityRecord> {
    let f = &signals.financial;
    let mut out = vec![
        OpportunityRecord {
            category: "working-capital".to_string(),
            potential_value: round_currency(f.revenue * rec::WORKING_CAPITAL_RATE),
            difficulty: Difficulty::Medium,
            description: "Working capital optimization across receivables and payables"
                .to_string(),
        },
        OpportunityRecord {
            category: "expense-review".to_string(),
            potential_value: round_currency(f.expenses * rec::EXPENSE_REVIEW_RATE),
            difficulty: Difficulty::Low,
            description: "Expense category review to cut recurring overspend".to_string(),
        },
        OpportunityRecord {
            category: "cash-flow-forecasting".to_string(),
            potential_value: round_currency(f.revenue * rec::CASH_FLOW_FORECAST_RATE),
            difficulty: Difficulty::Low,
            description: "Rolling cash flow forecast to anticipate shortfalls".to_string(),
        },
    ];

    if !signals.financial_estimated && f.debt_to_asset_ratio > rec::HIGH_LEVERAGE_RATIO {
        out.push(OpportunityRecord {
            category: "debt-restructuring".to_string(),
            potential_value: round_currency(f.total_liabilities * rec::DEBT_RESTRUCTURING_RATE),
            difficulty: Difficulty::High,
            description: "Debt restructuring to lower carrying cost".to_string(),
        });
    }

    out
}

fn round_currency(v: f64) -> f64 {
    if v.is_finite() {
        (v.max(0.0) * 100.0).round() / 100.0
    } else {
        0.0
    }
}
