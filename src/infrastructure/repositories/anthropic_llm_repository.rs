use super::llm_repository::{LlmRepository, LlmRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API implementation of LLM repository.
/// The API has no JSON mode; the system prompt asks for a bare JSON object.
pub struct AnthropicLlmRepository {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicLlmRepository {
    pub fn new(api_key: String, model: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmRepository for AnthropicLlmRepository {
    async fn complete_json(&self, request: &LlmRequest<'_>) -> Result<String, String> {
        let start_time = std::time::Instant::now();
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt,
            messages: [Message {
                role: "user",
                content: request.user_prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model, "Anthropic request failed");
                format!("Anthropic request failed: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::error!(status = status.as_u16(), error = %message, "Anthropic API error");
            return Err(format!("Anthropic API error ({}): {}", status.as_u16(), message));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid Anthropic response: {}", e))?;

        let text = first_text(&parsed).ok_or_else(|| "Anthropic returned no content".to_string())?;

        tracing::info!(
            provider = "anthropic",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            "LLM completion finished"
        );

        Ok(text)
    }

    fn provider(&self) -> &'static str {
        "anthropic"
    }
}

fn first_text(response: &MessagesResponse) -> Option<String> {
    response
        .content
        .iter()
        .find(|b| b.block_type == "text")
        .and_then(|b| b.text.clone())
        .filter(|t| !t.trim().is_empty())
}
