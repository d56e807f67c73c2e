use async_trait::async_trait;

/// A single chat completion asking for a JSON object back
#[derive(Debug, Clone)]
pub struct LlmRequest<'a> {
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Repository for LLM completions.
/// Abstracts the underlying provider (OpenAI, Anthropic)
///
/// Implementations return the raw text of the first completion; callers
/// own parsing and validation.
#[async_trait]
pub trait LlmRepository: Send + Sync {
    /// Run one completion and return the model's text
    ///
    /// # Errors
    /// Returns error text if the provider call fails or returns no content
    async fn complete_json(&self, request: &LlmRequest<'_>) -> Result<String, String>;

    /// Provider name for logs
    fn provider(&self) -> &'static str;
}
