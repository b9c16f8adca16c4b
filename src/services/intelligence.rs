//! Compute-intelligence pipeline: collect → normalize → score → recommend.
//!
//! Only the score cache write has side effects, and its failure never fails
//! the computation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::bus::EventBus;
use crate::constants::events;
use crate::data::scores::{AnalysisType, IntelligenceReport, RecommendationBundle, ScoreSet};
use crate::data::signals::{CompanyInfo, FinancialSignal, SignalBundle};
use crate::data::store::{CachedScore, ScoreCache};
use crate::error::{EngineError, EngineResult};
use crate::events::{Event, IntelligenceComputed};
use crate::services::collector::{SignalCollector, SignalRequest};
use crate::services::normalizer::{normalize, CanonicalSignals};
use crate::services::recommendations::recommend;
use crate::services::scoring::ScoringEngine;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceRequest {
    pub prospect_id: String,
    pub company: CompanyInfo,
    #[serde(default)]
    pub transcript_text: Option<String>,
    #[serde(default)]
    pub financial_data: Option<FinancialSignal>,
    /// `financial-health` | `deal-intelligence` | `comprehensive` (default).
    /// Only selects the score cache slot: every type runs the full pipeline
    /// and returns the same scores and recommendations for the same inputs.
    #[serde(default)]
    pub analysis_type: Option<String>,
}

impl IntelligenceRequest {
    pub fn new(prospect_id: &str, company_name: &str) -> Self {
        Self {
            prospect_id: prospect_id.to_string(),
            company: CompanyInfo {
                name: company_name.to_string(),
                industry: None,
            },
            ..Self::default()
        }
    }

    /// Checks identifying fields and the analysis selector before any work
    pub fn validate(&self) -> EngineResult<AnalysisType> {
        if self.prospect_id.trim().is_empty() {
            return Err(EngineError::validation("prospect_id is required"));
        }
        if self.company.name.trim().is_empty() {
            return Err(EngineError::validation("company.name is required"));
        }
        AnalysisType::parse_selector(self.analysis_type.as_deref())
    }
}

/// The pure part of the pipeline
pub fn analyze(
    bundle: &SignalBundle,
    scoring: &ScoringEngine,
) -> (CanonicalSignals, ScoreSet, RecommendationBundle) {
    let signals = normalize(bundle);
    let scores = scoring.score(&signals);
    let recommendations = recommend(&signals, &scores);
    (signals, scores, recommendations)
}

#[derive(Clone)]
pub struct IntelligenceEngine {
    collector: SignalCollector,
    scoring: ScoringEngine,
    cache: Arc<dyn ScoreCache>,
    bus: Option<EventBus>,
}

impl IntelligenceEngine {
    pub fn new(collector: SignalCollector, scoring: ScoringEngine, cache: Arc<dyn ScoreCache>) -> Self {
        Self {
            collector,
            scoring,
            cache,
            bus: None,
        }
    }

    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub async fn compute(&self, request: &IntelligenceRequest) -> EngineResult<IntelligenceReport> {
        let analysis_type = request.validate()?;
        let prospect_id = request.prospect_id.trim();

        info!(
            "🔎 [INTEL] Computing {} analysis for {} ({})",
            analysis_type, prospect_id, request.company.name
        );

        let collected = self
            .collector
            .collect(&SignalRequest {
                prospect_id,
                company: &request.company,
                transcript_text: request.transcript_text.as_deref(),
                financial_data: request.financial_data.as_ref(),
            })
            .await;

        let (signals, scores, recommendations) = analyze(&collected.bundle, &self.scoring);

        let mut report = IntelligenceReport {
            prospect_id: prospect_id.to_string(),
            company_name: request.company.name.trim().to_string(),
            analysis_type,
            scores,
            recommendations,
            data_quality: signals.data_quality,
            sources: collected.reports,
            generated_at: Utc::now(),
            record_id: None,
        };

        match self
            .cache
            .upsert_latest_score(prospect_id, analysis_type, report.to_scored_analysis())
            .await
        {
            Ok(id) => report.record_id = Some(id),
            Err(e) => warn!(
                event = events::SCORE_CACHE_FAILED,
                "⚠️ [INTEL] Could not cache scores for {}: {}", prospect_id, e
            ),
        }

        info!(
            event = events::INTELLIGENCE_COMPUTED,
            "✅ [INTEL] {} health={} closeability={} urgency={} readiness={} quality={}",
            prospect_id,
            scores.health_score,
            scores.closeability_score,
            scores.urgency_level.as_str(),
            scores.readiness_level.as_str(),
            report.data_quality.as_str()
        );

        if let Some(bus) = &self.bus {
            bus.emit(Event::IntelligenceComputed(IntelligenceComputed {
                prospect_id: prospect_id.to_string(),
                analysis_type,
                scores,
                data_quality: report.data_quality,
                cached: report.record_id.is_some(),
            }));
        }

        Ok(report)
    }

    pub async fn latest_score(
        &self,
        prospect_id: &str,
        analysis_type: Option<&str>,
    ) -> EngineResult<Option<CachedScore>> {
        let prospect_id = prospect_id.trim();
        if prospect_id.is_empty() {
            return Err(EngineError::validation("prospect_id is required"));
        }
        let analysis_type = match analysis_type.map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<AnalysisType>()?),
        };
        let cached = self.cache.get_latest_score(prospect_id, analysis_type).await?;
        if let Some(record) = &cached {
            record.analysis.scores.check_bounds().map_err(|e| {
                error!(
                    event = events::INVARIANT_VIOLATION,
                    "🚨 [INTEL] Cached record {} for {} is corrupt: {}", record.id, prospect_id, e
                );
                e
            })?;
        }
        Ok(cached)
    }
}
