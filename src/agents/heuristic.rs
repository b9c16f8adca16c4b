//! Offline transcript analyst: phrase tables matched sentence by sentence.
//! Used when no model API key is configured.

use async_trait::async_trait;

use crate::constants::urgency;
use crate::data::signals::{
    BudgetIndication, BusinessObjective, DecisionMaker, InfluenceLevel, ObjectiveHorizon,
    PainPoint, TranscriptSignal,
};
use crate::error::SourceResult;
use crate::services::scoring::mentions_unnegated;
use crate::sources::TranscriptAnalyst;

const BUYING_PHRASES: [&str; 9] = [
    "pricing",
    "how much",
    "contract",
    "next steps",
    "get started",
    "proposal",
    "onboarding",
    "free trial",
    "sign up",
];

const OBJECTION_PHRASES: [&str; 8] = [
    "too expensive",
    "not sure",
    "concern",
    "already have",
    "not a priority",
    "hesitant",
    "worried",
    "can't afford",
];

const COMPETITOR_PHRASES: [&str; 5] = [
    "competitor",
    "also evaluating",
    "also looking at",
    "alternative",
    "currently using",
];

const PRESSURE_PHRASES: [&str; 7] = [
    "losing money",
    "missed payroll",
    "behind on",
    "overdue",
    "late payments",
    "running out of cash",
    "bank is asking",
];

const TIMELINE_PHRASES: [&str; 8] = [
    "by the end of",
    "within",
    "before",
    "next month",
    "this quarter",
    "this month",
    "weeks",
    "deadline",
];

const SHORT_TERM_PHRASES: [&str; 6] = [
    "this quarter",
    "this month",
    "next month",
    "soon",
    "weeks",
    "this year",
];

const OBJECTIVE_PHRASES: [&str; 5] = ["goal", "want to", "plan to", "objective", "hoping to"];

const TIGHT_BUDGET_PHRASES: [&str; 4] = ["tight", "limited", "no budget", "constrained"];

/// (phrase, pain point category)
const PAIN_CATEGORIES: [(&str, &str); 8] = [
    ("cash flow", "cash-flow"),
    ("reporting", "reporting"),
    ("visibility", "reporting"),
    ("spreadsheet", "manual-processes"),
    ("manual", "manual-processes"),
    ("tax", "tax"),
    ("payroll", "payroll"),
    ("margin", "profitability"),
];

/// (title, influence)
const DECISION_TITLES: [(&str, InfluenceLevel); 8] = [
    ("owner", InfluenceLevel::High),
    ("founder", InfluenceLevel::High),
    ("ceo", InfluenceLevel::High),
    ("cfo", InfluenceLevel::High),
    ("president", InfluenceLevel::High),
    ("controller", InfluenceLevel::Medium),
    ("director", InfluenceLevel::Medium),
    ("manager", InfluenceLevel::Medium),
];

#[derive(Clone, Debug, Default)]
pub struct HeuristicTranscriptAnalyst;

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| matches!(c, '.' | '!' | '?' | '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn extract_signals(transcript_text: &str) -> TranscriptSignal {
    let mut signal = TranscriptSignal::default();

    for sentence in sentences(transcript_text) {
        let lower = sentence.to_lowercase();
        let quoted = sentence.to_string();

        if contains_any(&lower, &BUYING_PHRASES) {
            signal.buying_signals.push(quoted.clone());
        }
        let objection = contains_any(&lower, &OBJECTION_PHRASES);
        if objection {
            signal.objections.push(quoted.clone());
        }
        if contains_any(&lower, &COMPETITOR_PHRASES) {
            signal.competitive_alternatives.push(quoted.clone());
        }
        if contains_any(&lower, &PRESSURE_PHRASES) {
            signal.pressure_points.push(quoted.clone());
        }
        // An objection ("not a priority") is never also an urgency phrase
        let urgent = urgency::HIGH_KEYWORDS
            .iter()
            .chain(urgency::MEDIUM_KEYWORDS.iter())
            .any(|k| mentions_unnegated(&lower, k));
        if urgent && !objection {
            signal.urgency_phrases.push(quoted.clone());
        }
        if signal.timeline.is_none() && contains_any(&lower, &TIMELINE_PHRASES) {
            signal.timeline = Some(quoted.clone());
        }

        for (phrase, category) in PAIN_CATEGORIES {
            if lower.contains(phrase) && !signal.pain_points.iter().any(|p| p.category == category) {
                signal.pain_points.push(PainPoint {
                    category: category.to_string(),
                    description: quoted.clone(),
                });
            }
        }

        for (title, influence) in DECISION_TITLES {
            if contains_word(&lower, title)
                && !signal.decision_makers.iter().any(|d| d.role.as_deref() == Some(title))
            {
                signal.decision_makers.push(DecisionMaker {
                    name: title.to_uppercase(),
                    role: Some(title.to_string()),
                    influence,
                });
            }
        }

        if contains_any(&lower, &OBJECTIVE_PHRASES) {
            let horizon = if contains_any(&lower, &SHORT_TERM_PHRASES) {
                ObjectiveHorizon::ShortTerm
            } else {
                ObjectiveHorizon::LongTerm
            };
            signal.objectives.push(BusinessObjective {
                description: quoted.clone(),
                horizon,
            });
        }

        if lower.contains("budget") {
            let budget = signal.budget.get_or_insert_with(BudgetIndication::default);
            budget.mentioned = true;
            budget.tight |= contains_any(&lower, &TIGHT_BUDGET_PHRASES);
        }
    }

    signal
}

#[async_trait]
impl TranscriptAnalyst for HeuristicTranscriptAnalyst {
    fn name(&self) -> &'static str {
        "heuristic-transcript"
    }

    async fn analyze(&self, _prospect_id: &str, transcript_text: &str) -> SourceResult<TranscriptSignal> {
        Ok(extract_signals(transcript_text))
    }
}
