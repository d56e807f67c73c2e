use super::llm_repository::{LlmRepository, LlmRequest};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI chat completions implementation of LLM repository
pub struct OpenAiLlmRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiLlmRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmRepository for OpenAiLlmRepository {
    async fn complete_json(&self, request: &LlmRequest<'_>) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_prompt)
            .build()
            .map_err(|e| format!("Failed to build system message: {}", e))?;
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user_prompt)
            .build()
            .map_err(|e| format!("Failed to build user message: {}", e))?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([system_message.into(), user_message.into()])
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| format!("Failed to build chat request: {}", e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI chat completion failed");
            format!("OpenAI API error: {}", e)
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| "OpenAI returned no content".to_string())?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            prompt_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            "LLM completion finished"
        );

        Ok(content)
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
