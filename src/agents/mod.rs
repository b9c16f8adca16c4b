pub mod heuristic;
pub mod transcript;

use async_trait::async_trait;
use tracing::info;

use crate::error::SourceResult;
use crate::llm::LLMClient;

pub use heuristic::HeuristicTranscriptAnalyst;
pub use transcript::{LlmTranscriptAnalyst, TranscriptAgent};

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    fn system_prompt(&self) -> &str;

    async fn run(&self, query: &str, llm: &LLMClient) -> SourceResult<String> {
        info!("🤖 [AGENT] Sending request to {}...", self.name());
        let response = llm.chat(self.system_prompt(), query).await?;
        info!("🤖 [AGENT] Response from {} ({} chars)", self.name(), response.len());
        Ok(response)
    }
}
