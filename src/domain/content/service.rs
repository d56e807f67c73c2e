use super::error::GenerationError;
use super::model::{GeneratedContent, Stage, Tone, UserContext, TARGET_DURATION_SECONDS};
use super::selector::{select_regeneration_template, select_template};
use super::templates::{template_or_default, PromptTemplate};
use crate::infrastructure::repositories::{LlmRepository, LlmRequest};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

/// Average speaking pace used to size scripts
pub const WORDS_PER_MINUTE: f64 = 155.0;
const MIN_SPOKEN_MINUTES: f64 = 4.5;
const MAX_SPOKEN_MINUTES: f64 = 5.5;

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 2000;

static PLACEHOLDER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\{\{(\w+)\}\}").expect("valid placeholder pattern"));

/// JSON shape the prompts ask the model for
#[derive(Debug, Deserialize)]
struct ScriptResponse {
    title: String,
    script: String,
    #[serde(rename = "keyPoints", default)]
    key_points: Vec<String>,
    #[serde(default)]
    tone: Option<String>,
}

pub struct ContentService {
    llm_repo: Arc<dyn LlmRepository>,
}

impl ContentService {
    pub fn new(llm_repo: Arc<dyn LlmRepository>) -> Self {
        Self { llm_repo }
    }
}

#[async_trait]
pub trait ContentServiceApi: Send + Sync {
    /// Generate today's five-minute script for a user
    ///
    /// Picks a template from the context, calls the LLM once and rejects
    /// scripts that would not last 4.5-5.5 minutes. There is no retry.
    async fn generate_daily_content(
        &self,
        ctx: &UserContext,
    ) -> Result<GeneratedContent, GenerationError>;

    /// Generate a replacement script after user feedback
    async fn regenerate_content(
        &self,
        ctx: &UserContext,
        negative_feedback: bool,
    ) -> Result<GeneratedContent, GenerationError>;
}

#[async_trait]
impl ContentServiceApi for ContentService {
    async fn generate_daily_content(
        &self,
        ctx: &UserContext,
    ) -> Result<GeneratedContent, GenerationError> {
        let template_name = {
            let mut rng = rand::thread_rng();
            select_template(ctx, &mut rng)
        };

        tracing::info!(
            user_id = %ctx.user_id,
            template = template_name,
            total_days_active = ctx.total_days_active,
            current_streak = ctx.current_streak,
            "Generating daily content"
        );

        self.generate_with_template(ctx, template_or_default(template_name))
            .await
    }

    async fn regenerate_content(
        &self,
        ctx: &UserContext,
        negative_feedback: bool,
    ) -> Result<GeneratedContent, GenerationError> {
        let template_name = select_regeneration_template(negative_feedback);

        tracing::info!(
            user_id = %ctx.user_id,
            template = template_name,
            negative_feedback = negative_feedback,
            "Regenerating content"
        );

        self.generate_with_template(ctx, template_or_default(template_name))
            .await
    }
}

impl ContentService {
    async fn generate_with_template(
        &self,
        ctx: &UserContext,
        template: &PromptTemplate,
    ) -> Result<GeneratedContent, GenerationError> {
        let start_time = std::time::Instant::now();
        let user_prompt = fill_template(template, ctx)?;

        let request = LlmRequest {
            system_prompt: template.system_prompt,
            user_prompt: &user_prompt,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let raw = self.llm_repo.complete_json(&request).await.map_err(|e| {
            tracing::error!(
                provider = self.llm_repo.provider(),
                template = template.name,
                error = %e,
                "LLM call failed"
            );
            GenerationError::Llm(e)
        })?;

        let content = parse_script_response(&raw, template, ctx)?;

        tracing::info!(
            provider = self.llm_repo.provider(),
            user_id = %ctx.user_id,
            template = template.name,
            word_count = content.word_count,
            latency_ms = start_time.elapsed().as_millis(),
            "Daily content generated"
        );

        Ok(content)
    }
}

/// Substitute every `{{var}}` in the template's user prompt
pub fn fill_template(
    template: &PromptTemplate,
    ctx: &UserContext,
) -> Result<String, GenerationError> {
    let values = context_variables(ctx);

    for variable in template.variables {
        if !values.contains_key(variable) {
            return Err(GenerationError::MissingVariable(variable.to_string()));
        }
    }

    let mut missing: Option<String> = None;
    let filled = PLACEHOLDER.replace_all(&template.user_prompt, |caps: &regex::Captures| {
        match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(variable) => Err(GenerationError::MissingVariable(variable)),
        None => Ok(filled.into_owned()),
    }
}

fn context_variables(ctx: &UserContext) -> HashMap<&'static str, String> {
    let name = if ctx.name.trim().is_empty() {
        "friend".to_string()
    } else {
        ctx.name.clone()
    };

    HashMap::from([
        ("name", name),
        ("pain_points", join_or(&ctx.pain_points, "not shared yet")),
        ("goals", join_or(&ctx.goals, "not shared yet")),
        ("learning_style", ctx.learning_style.to_string()),
        ("coaching_style", ctx.learning_style.coaching_hint().to_string()),
        ("energy_level", ctx.energy_level.to_string()),
        ("current_streak", ctx.current_streak.to_string()),
        ("longest_streak", ctx.longest_streak.to_string()),
        ("total_days_active", ctx.total_days_active.to_string()),
        ("stage", ctx.stage.to_string()),
        ("time_of_day", ctx.time_of_day.as_str().to_string()),
    ])
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn parse_script_response(
    raw: &str,
    template: &PromptTemplate,
    ctx: &UserContext,
) -> Result<GeneratedContent, GenerationError> {
    let response: ScriptResponse = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let script = response.script.trim().to_string();
    if script.is_empty() {
        return Err(GenerationError::InvalidResponse("empty script".to_string()));
    }

    let words = count_words(&script);
    let minutes = words as f64 / WORDS_PER_MINUTE;
    if !(MIN_SPOKEN_MINUTES..=MAX_SPOKEN_MINUTES).contains(&minutes) {
        return Err(GenerationError::WordCount { words, minutes });
    }

    let tone = response
        .tone
        .as_deref()
        .and_then(Tone::parse)
        .unwrap_or(template.tone);

    Ok(GeneratedContent {
        title: response.title.trim().to_string(),
        script,
        duration_seconds: TARGET_DURATION_SECONDS,
        key_points: response
            .key_points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        stage: Stage::from_total_days_active(ctx.total_days_active),
        tone,
        template_name: template.name.to_string(),
        word_count: words as i32,
    })
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Spoken length of a script in minutes at the coaching pace
pub fn estimate_speaking_minutes(text: &str) -> f64 {
    count_words(text) as f64 / WORDS_PER_MINUTE
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}
