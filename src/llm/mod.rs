use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::LlmConfig;
use crate::error::{SourceError, SourceResult};

/// Chat-completion client with a cap on in-flight requests
#[derive(Clone)]
pub struct LLMClient {
    pub client: Client<OpenAIConfig>,
    pub model: String,
    permits: Arc<Semaphore>,
}

impl LLMClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String, max_concurrent: usize) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let client = Client::with_config(config);
        Self {
            client,
            model,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.api_key.clone().unwrap_or_default(),
            config.base_url.clone(),
            config.model.clone(),
            config.max_concurrent,
        )
    }

    pub async fn chat(&self, system_prompt: &str, user_input: &str) -> SourceResult<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| SourceError::Llm(e.to_string()))?;

        info!("🤖 Sending request to LLM (Model: {})...", self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system_prompt)
                        .build()
                        .map_err(|e| SourceError::Llm(e.to_string()))?,
                ),
                ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user_input)
                        .build()
                        .map_err(|e| SourceError::Llm(e.to_string()))?,
                ),
            ])
            .build()
            .map_err(|e| SourceError::Llm(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SourceError::Llm(e.to_string()))?;

        info!("🤖 LLM Response received.");

        Ok(response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }
}
