//! Scoring engine: canonical signals in, bounded composite scores out.
//!
//! The four scores are computed independently of each other. Nothing here
//! suspends or fails; absent inputs were already zeroed by the normalizer.

use std::sync::Arc;
use tracing::error;

use crate::config::ScoringRules;
use crate::constants::{closeability, events, health, neutral, readiness, urgency};
use crate::data::scores::{ReadinessLevel, ScoreSet, UrgencyLevel};
use crate::services::normalizer::{CanonicalSignals, MarketFacts, TranscriptFacts};

/// Swappable urgency/readiness heuristics
pub trait SignalClassifier: Send + Sync {
    /// Does the prospect's stated timeline carry an urgent/soon marker?
    fn has_urgency_marker(&self, facts: &TranscriptFacts) -> bool;
    fn urgency(&self, facts: &TranscriptFacts) -> UrgencyLevel;
    fn readiness(&self, facts: &TranscriptFacts) -> ReadinessLevel;
}

/// Keyword/threshold table classifier
#[derive(Clone, Debug, Default)]
pub struct KeywordClassifier {
    rules: ScoringRules,
}

impl KeywordClassifier {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    fn keyword_urgency(&self, text: &str) -> UrgencyLevel {
        let text = text.to_lowercase();
        let matches = |keywords: &[String]| {
            keywords
                .iter()
                .any(|k| mentions_unnegated(&text, &k.to_lowercase()))
        };

        if matches(&self.rules.high_urgency_keywords) {
            UrgencyLevel::High
        } else if matches(&self.rules.medium_urgency_keywords) {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }

    fn pressure_urgency(&self, pressure_points: usize) -> UrgencyLevel {
        if pressure_points > self.rules.high_pressure_points {
            UrgencyLevel::High
        } else if pressure_points > self.rules.medium_pressure_points {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Low
        }
    }
}

impl SignalClassifier for KeywordClassifier {
    fn has_urgency_marker(&self, facts: &TranscriptFacts) -> bool {
        self.keyword_urgency(&facts.urgency_text) > UrgencyLevel::Low
    }

    fn urgency(&self, facts: &TranscriptFacts) -> UrgencyLevel {
        self.keyword_urgency(&facts.urgency_text)
            .max(self.pressure_urgency(facts.pressure_points))
    }

    fn readiness(&self, facts: &TranscriptFacts) -> ReadinessLevel {
        let buying = facts.buying_signals;
        let champions = facts.high_influence_decision_makers;

        if buying >= readiness::READY_MIN_BUYING_SIGNALS
            && facts.objections <= readiness::READY_MAX_OBJECTIONS
            && champions >= readiness::MIN_HIGH_INFLUENCE
        {
            ReadinessLevel::Ready
        } else if buying >= readiness::EVALUATING_MIN_BUYING_SIGNALS
            && champions >= readiness::MIN_HIGH_INFLUENCE
        {
            ReadinessLevel::Evaluating
        } else if buying >= 1 || facts.short_term_objectives > 0 {
            ReadinessLevel::Exploring
        } else {
            ReadinessLevel::NotReady
        }
    }
}

/// True when `keyword` occurs in `text` at least once without a negator
/// among the words just before it ("not urgent", "not a priority").
/// Both arguments are expected lower-cased.
pub fn mentions_unnegated(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    text.match_indices(keyword).any(|(at, _)| {
        !text[..at]
            .split_whitespace()
            .rev()
            .take(urgency::NEGATION_WINDOW)
            .map(|word| {
                word.replace('\u{2019}', "'")
                    .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_string()
            })
            .any(|word| urgency::NEGATORS.contains(&word.as_str()))
    })
}

#[derive(Clone)]
pub struct ScoringEngine {
    rules: ScoringRules,
    classifier: Arc<dyn SignalClassifier>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringRules::default())
    }
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        let classifier = Arc::new(KeywordClassifier::new(rules.clone()));
        Self { rules, classifier }
    }

    pub fn with_classifier(rules: ScoringRules, classifier: Arc<dyn SignalClassifier>) -> Self {
        Self { rules, classifier }
    }

    pub fn score(&self, signals: &CanonicalSignals) -> ScoreSet {
        ScoreSet {
            health_score: health_score(signals),
            closeability_score: closeability_score(
                &signals.transcript,
                &self.rules,
                self.classifier.as_ref(),
            ),
            urgency_level: self.classifier.urgency(&signals.transcript),
            readiness_level: self.classifier.readiness(&signals.transcript),
        }
    }
}

/// First tier whose threshold `value` reaches (inclusive)
fn tier_points(value: f64, tiers: &[(f64, i64)]) -> i64 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn stability_points(debt_to_asset: f64) -> i64 {
    health::STABILITY_TIERS
        .iter()
        .find(|(ceiling, _)| debt_to_asset < *ceiling)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

fn market_adjustment(market: Option<&MarketFacts>) -> i64 {
    match market {
        Some(m) if m.industry_growth_rate >= health::STRONG_GROWTH_RATE => health::GROWTH_BONUS,
        Some(m) if m.industry_growth_rate < 0.0 => health::CONTRACTION_PENALTY,
        _ => 0,
    }
}

/// Financial health, 0..=100. Base 0 accumulating per tier; the neutral
/// baseline when no financial bundle exists.
pub fn health_score(signals: &CanonicalSignals) -> u8 {
    if signals.financial_estimated {
        return neutral::HEALTH_SCORE;
    }

    let f = &signals.financial;
    let profitability = if f.profit_margin > 0.0 {
        match tier_points(f.profit_margin, &health::PROFITABILITY_TIERS) {
            0 => health::POSITIVE_MARGIN_POINTS,
            points => points,
        }
    } else {
        0
    };

    let raw = tier_points(f.revenue, &health::REVENUE_TIERS)
        + profitability
        + tier_points(f.current_ratio, &health::LIQUIDITY_TIERS)
        + stability_points(f.debt_to_asset_ratio)
        + market_adjustment(signals.market.as_ref());

    ensure_score_bounds("health_score", raw.clamp(0, 100))
}

/// Likelihood the deal closes, 0..=100, from transcript sales signals
pub fn closeability_score(
    facts: &TranscriptFacts,
    rules: &ScoringRules,
    classifier: &dyn SignalClassifier,
) -> u8 {
    let buying_points = (facts.buying_signals as i64)
        .saturating_mul(closeability::POINTS_PER_BUYING_SIGNAL)
        .min(rules.max_buying_signal_points);

    let mut raw = closeability::BASE + buying_points;
    if classifier.has_urgency_marker(facts) {
        raw += closeability::URGENCY_MARKER_POINTS;
    }
    if facts.high_influence_decision_makers > 0 {
        raw += closeability::HIGH_INFLUENCE_POINTS;
    }
    if facts.budget_mentioned && !facts.budget_tight {
        raw += closeability::OPEN_BUDGET_POINTS;
    }
    raw -= (facts.objections as i64).saturating_mul(closeability::PENALTY_PER_OBJECTION);
    if facts.competitive_alternatives > closeability::COMPETITION_THRESHOLD {
        raw -= closeability::CROWDED_COMPETITION_PENALTY;
    }

    ensure_score_bounds("closeability_score", raw.clamp(0, 100))
}

/// Last line of defense for the [0,100] invariant. The built-in formulas
/// clamp their own sums, so this only fires for a formula that forgot to
/// (a new score or a custom `ScoringEngine` caller). A value outside the
/// range is an engine bug: panic in debug builds, clamp and log in release.
pub fn ensure_score_bounds(name: &str, value: i64) -> u8 {
    if (0..=100).contains(&value) {
        return value as u8;
    }

    if cfg!(debug_assertions) {
        panic!("{} out of bounds: {}", name, value);
    }
    error!(
        event = events::INVARIANT_VIOLATION,
        "🚨 [SCORING] {} out of bounds ({}); clamping", name, value
    );
    value.clamp(0, 100) as u8
}
