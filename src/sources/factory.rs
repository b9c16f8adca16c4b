use std::sync::Arc;
use tracing::info;

use crate::agents::{HeuristicTranscriptAnalyst, LlmTranscriptAnalyst};
use crate::config::AppConfig;
use crate::error::EngineError;
use crate::llm::LLMClient;

use super::{
    http::{HttpFinancialSource, HttpMarketSource},
    memory::{InMemoryFinancialSource, InMemoryMarketSource},
    traits::{FinancialSource, MarketSource, TranscriptAnalyst},
};

#[derive(Clone)]
pub struct SignalSources {
    pub financial: Arc<dyn FinancialSource>,
    pub market: Arc<dyn MarketSource>,
    pub transcript: Arc<dyn TranscriptAnalyst>,
}

impl SignalSources {
    /// No external calls: empty in-memory sources and the heuristic analyst
    pub fn offline() -> Self {
        Self {
            financial: Arc::new(InMemoryFinancialSource::new()),
            market: Arc::new(InMemoryMarketSource::new()),
            transcript: Arc::new(HeuristicTranscriptAnalyst),
        }
    }
}

pub fn build_sources(config: &AppConfig) -> Result<SignalSources, EngineError> {
    let mut sources = SignalSources::offline();

    if let Some(base) = &config.sources.financial_base_url {
        let source = HttpFinancialSource::new(base)
            .map_err(|e| EngineError::Config(format!("financial_base_url: {}", e)))?;
        info!("🏦 Using accounting connector at {}", base);
        sources.financial = Arc::new(source);
    }

    if let Some(base) = &config.sources.market_base_url {
        let source = HttpMarketSource::new(base)
            .map_err(|e| EngineError::Config(format!("market_base_url: {}", e)))?;
        info!("📊 Using market indicators at {}", base);
        sources.market = Arc::new(source);
    }

    if config.llm_enabled() {
        info!("🤖 Using LLM transcript analyst (Model: {})", config.llm.model);
        sources.transcript = Arc::new(LlmTranscriptAnalyst::new(LLMClient::from_config(&config.llm)));
    } else {
        info!("ℹ️ No LLM API key set - using heuristic transcript analyst");
    }

    Ok(sources)
}
