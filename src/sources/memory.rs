//! In-process sources, used offline and in tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::traits::{FinancialSource, MarketSource};
use crate::data::signals::{FinancialSignal, MarketSignal};
use crate::error::SourceResult;

#[derive(Clone, Default)]
pub struct InMemoryFinancialSource {
    statements: Arc<DashMap<String, FinancialSignal>>,
}

impl InMemoryFinancialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, prospect_id: &str, signal: FinancialSignal) {
        self.statements.insert(prospect_id.to_string(), signal);
    }
}

#[async_trait]
impl FinancialSource for InMemoryFinancialSource {
    fn name(&self) -> &'static str {
        "memory-financials"
    }

    async fn fetch_financials(&self, prospect_id: &str) -> SourceResult<Option<FinancialSignal>> {
        Ok(self.statements.get(prospect_id).map(|s| s.value().clone()))
    }
}

/// Market indicators keyed by lower-cased industry name
#[derive(Clone, Default)]
pub struct InMemoryMarketSource {
    indicators: Arc<DashMap<String, MarketSignal>>,
}

impl InMemoryMarketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, industry: &str, signal: MarketSignal) {
        self.indicators.insert(industry.trim().to_lowercase(), signal);
    }
}

#[async_trait]
impl MarketSource for InMemoryMarketSource {
    fn name(&self) -> &'static str {
        "memory-market"
    }

    async fn fetch_market(&self, industry: &str) -> SourceResult<Option<MarketSignal>> {
        let key = industry.trim().to_lowercase();
        Ok(self.indicators.get(&key).map(|s| s.value().clone()))
    }
}
