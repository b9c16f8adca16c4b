use async_trait::async_trait;
use tracing::{info, warn};

use crate::agents::Agent;
use crate::data::signals::TranscriptSignal;
use crate::error::{SourceError, SourceResult};
use crate::llm::LLMClient;
use crate::sources::TranscriptAnalyst;

pub struct TranscriptAgent;

impl Agent for TranscriptAgent {
    fn name(&self) -> &str {
        "Transcript-Analyst"
    }

    fn system_prompt(&self) -> &str {
        r#"You are a sales call analyst. You read the transcript of a discovery call with a small or mid-sized business and extract structured sales signals.

RULES:
1. Only report what the prospect actually said. Do not invent decision makers or budgets.
2. Quote short phrases for buying_signals, objections, urgency_phrases and pressure_points.
3. influence is "high" for owners, founders, CEOs and CFOs who can sign; "medium" for managers who recommend; otherwise "low".
4. horizon is "short-term" for goals due within the next two quarters, otherwise "long-term".
5. Leave a list empty when nothing applies.

OUTPUT FORMAT - Must be valid JSON:
{
    "pain_points": [{"category": "cash-flow", "description": "..."}],
    "objectives": [{"description": "...", "horizon": "short-term"}],
    "decision_makers": [{"name": "...", "role": "CFO", "influence": "high"}],
    "timeline": "we need this before year end",
    "urgency_phrases": ["..."],
    "pressure_points": ["..."],
    "competitive_alternatives": ["..."],
    "buying_signals": ["..."],
    "objections": ["..."],
    "budget": {"mentioned": true, "tight": false, "amount": 25000}
}
"#
    }
}

/// Pull the outermost JSON object out of a chat response, tolerating code
/// fences and leading prose.
pub fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

pub fn parse_transcript_response(response: &str) -> SourceResult<TranscriptSignal> {
    let json = extract_json(response)
        .ok_or_else(|| SourceError::Llm("response contained no JSON object".to_string()))?;
    Ok(serde_json::from_str(json)?)
}

/// Text insight producer backed by a chat-completion model
#[derive(Clone)]
pub struct LlmTranscriptAnalyst {
    llm: LLMClient,
}

impl LlmTranscriptAnalyst {
    pub fn new(llm: LLMClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TranscriptAnalyst for LlmTranscriptAnalyst {
    fn name(&self) -> &'static str {
        "llm-transcript"
    }

    async fn analyze(&self, prospect_id: &str, transcript_text: &str) -> SourceResult<TranscriptSignal> {
        info!("📝 [TRANSCRIPT] Analyzing {} chars for {}", transcript_text.len(), prospect_id);
        let response = TranscriptAgent.run(transcript_text, &self.llm).await?;

        parse_transcript_response(&response).map_err(|e| {
            warn!("📝 [TRANSCRIPT] Unparseable analysis for {}: {}", prospect_id, e);
            e
        })
    }
}
