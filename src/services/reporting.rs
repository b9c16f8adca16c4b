use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    bus::EventBus,
    data::workflow::WorkflowStage,
    events::Event,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub ts: String,
    pub prospect_id: String,
    pub event: Event,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub computations: u64,

    /// Computations whose result could not be cached
    pub uncached_computations: u64,

    /// Keyed by data quality literal
    pub per_data_quality: BTreeMap<String, u64>,

    /// Keyed by readiness literal
    pub per_readiness: BTreeMap<String, u64>,

    pub stage_transitions: u64,
    pub workflows_started: u64,
    pub resets: u64,

    /// Where each live workflow currently sits
    pub current_stage: BTreeMap<String, WorkflowStage>,
}

/// Subscribes to the event bus, keeps running counters, and appends every
/// event to a JSONL activity log with a summary file beside it.
#[derive(Clone)]
pub struct ActivityReporter {
    summary: Arc<Mutex<ActivitySummary>>,
    log_path: PathBuf,
}

impl ActivityReporter {
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            summary: Arc::new(Mutex::new(ActivitySummary::default())),
            log_path,
        }
    }

    pub fn summary(&self) -> ActivitySummary {
        match self.summary.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.log_path.with_file_name("activity_summary.json")
    }

    pub async fn start(&self, event_bus: EventBus) {
        let mut rx = event_bus.subscribe();
        let reporter = self.clone();

        tokio::spawn(async move {
            info!("📈 ActivityReporter started (log: {})", reporter.log_path.display());

            loop {
                let event = match rx.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("📈 ActivityReporter lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                reporter.record(&event);

                if let Err(e) = reporter.append_jsonl(&event) {
                    error!("ActivityReporter failed to append log: {}", e);
                }
                if let Err(e) = reporter.flush_summary() {
                    error!("ActivityReporter failed to flush summary: {}", e);
                }
            }
        });
    }

    /// Fold one event into the running summary
    pub fn record(&self, event: &Event) {
        let mut s = match self.summary.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        };

        match event {
            Event::IntelligenceComputed(e) => {
                s.computations += 1;
                if !e.cached {
                    s.uncached_computations += 1;
                }
                *s.per_data_quality
                    .entry(e.data_quality.as_str().to_string())
                    .or_insert(0) += 1;
                *s.per_readiness
                    .entry(e.scores.readiness_level.as_str().to_string())
                    .or_insert(0) += 1;
            }
            Event::StageAdvanced(e) => {
                if e.from.is_none() {
                    s.workflows_started += 1;
                }
                if e.from != Some(e.to) {
                    s.stage_transitions += 1;
                }
                s.current_stage.insert(e.prospect_id.clone(), e.to);
            }
            Event::WorkflowReset { prospect_id } => {
                s.resets += 1;
                s.current_stage.remove(prospect_id);
            }
        }
    }

    fn append_jsonl(&self, event: &Event) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use std::io::Write;

        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let entry = ActivityLogEntry {
            ts: Utc::now().to_rfc3339(),
            prospect_id: event.prospect_id().to_string(),
            event: event.clone(),
        };
        writeln!(f, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }

    fn flush_summary(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let summary_path = self.summary_path();
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let s = self.summary();
        std::fs::write(summary_path, serde_json::to_vec_pretty(&s)?)?;
        Ok(())
    }
}
