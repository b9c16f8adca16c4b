use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{closeability, collector, urgency};
use crate::error::EngineError;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Per-source fetch timeout; every external fetch runs under it
    pub fetch_timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: collector::DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl CollectorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Keyword and threshold tables used by the scoring engine
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringRules {
    pub high_urgency_keywords: Vec<String>,
    pub medium_urgency_keywords: Vec<String>,
    pub high_pressure_points: usize,
    pub medium_pressure_points: usize,
    pub max_buying_signal_points: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            high_urgency_keywords: urgency::HIGH_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            medium_urgency_keywords: urgency::MEDIUM_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            high_pressure_points: urgency::HIGH_PRESSURE_POINTS,
            medium_pressure_points: urgency::MEDIUM_PRESSURE_POINTS,
            max_buying_signal_points: closeability::MAX_BUYING_SIGNAL_POINTS,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_concurrent: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_concurrent: 4,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Accounting connector base URL; unset means caller-supplied data only
    pub financial_base_url: Option<String>,
    /// Economic indicator service base URL; unset means no market context
    pub market_base_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub log_path: PathBuf,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./data/activity.jsonl"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub collector: CollectorConfig,
    pub scoring: ScoringRules,
    pub llm: LlmConfig,
    pub sources: SourcesConfig,
    pub activity: ActivityConfig,
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "config.yaml";

    /// Load from `PROSPECT_INTEL_CONFIG` (or `config.yaml`), then apply env overrides.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, EngineError> {
        let path = std::env::var("PROSPECT_INTEL_CONFIG")
            .unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, EngineError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.server.bind_addr = addr;
            }
        }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}
