use super::error::GenerationError;
use super::model::{DailyContent, UserContext};
use super::service::ContentServiceApi;
use super::DailyContentRepository;
use crate::domain::queue::{NewAudioJob, QueueServiceApi};
use crate::domain::tts::VoiceSettings;
use crate::domain::user::{User, UserProfile, UserProgress, UserRepository};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationSummary {
    pub generated: u32,
    pub failed: u32,
    /// Users who already had content for the date
    pub skipped: u32,
}

enum UserOutcome {
    Generated,
    Skipped,
}

/// Creates each subscriber's daily script and hands it to the audio queue
pub struct DailyContentService {
    user_repo: Arc<dyn UserRepository>,
    content_repo: Arc<dyn DailyContentRepository>,
    content_service: Arc<dyn ContentServiceApi>,
    queue_service: Arc<dyn QueueServiceApi>,
    concurrency: usize,
}

impl DailyContentService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        content_repo: Arc<dyn DailyContentRepository>,
        content_service: Arc<dyn ContentServiceApi>,
        queue_service: Arc<dyn QueueServiceApi>,
        concurrency: usize,
    ) -> Self {
        Self {
            user_repo,
            content_repo,
            content_service,
            queue_service,
            concurrency,
        }
    }
}

#[async_trait]
pub trait DailyContentServiceApi: Send + Sync {
    /// Generate content for every active subscriber lacking it on `date`.
    /// Per-user failures are counted, never propagated.
    async fn generate_for_date(&self, date: NaiveDate) -> Result<GenerationSummary, GenerationError>;

    /// Replace a user's content for `date` and queue fresh audio
    async fn regenerate_for_user(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        negative_feedback: bool,
    ) -> Result<DailyContent, GenerationError>;
}

#[async_trait]
impl DailyContentServiceApi for DailyContentService {
    async fn generate_for_date(&self, date: NaiveDate) -> Result<GenerationSummary, GenerationError> {
        let start_time = std::time::Instant::now();
        let users = self.user_repo.find_content_recipients().await?;

        tracing::info!(date = %date, recipients = users.len(), "Starting daily content generation");

        let mut summary = GenerationSummary::default();
        for window in users.chunks(self.concurrency.max(1)) {
            let outcomes = join_all(window.iter().map(|user| self.generate_for_user(user, date))).await;

            for (user, outcome) in window.iter().zip(outcomes) {
                match outcome {
                    Ok(UserOutcome::Generated) => summary.generated += 1,
                    Ok(UserOutcome::Skipped) => summary.skipped += 1,
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!(
                            user_id = %user.id,
                            date = %date,
                            error = %e,
                            "Daily content generation failed for user"
                        );
                    }
                }
            }
        }

        tracing::info!(
            date = %date,
            generated = summary.generated,
            failed = summary.failed,
            skipped = summary.skipped,
            latency_ms = start_time.elapsed().as_millis(),
            "Daily content generation finished"
        );

        Ok(summary)
    }

    async fn regenerate_for_user(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        negative_feedback: bool,
    ) -> Result<DailyContent, GenerationError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(GenerationError::UserNotFound)?;

        let (ctx, profile) = self.load_context(&user).await?;
        let generated = self
            .content_service
            .regenerate_content(&ctx, negative_feedback)
            .await?;

        let content = self
            .content_repo
            .replace_for_date(user.id, date, &generated)
            .await?;
        self.enqueue_audio(&content, &profile).await?;

        tracing::info!(
            user_id = %user.id,
            content_id = %content.id,
            template = %content.template_name,
            "Content regenerated"
        );

        Ok(content)
    }
}

impl DailyContentService {
    async fn generate_for_user(
        &self,
        user: &User,
        date: NaiveDate,
    ) -> Result<UserOutcome, GenerationError> {
        if self.content_repo.exists_for_user_on(user.id, date).await? {
            return Ok(UserOutcome::Skipped);
        }

        let (ctx, profile) = self.load_context(user).await?;
        let generated = self.content_service.generate_daily_content(&ctx).await?;
        let content = self.content_repo.insert(user.id, date, &generated).await?;
        self.enqueue_audio(&content, &profile).await?;

        tracing::debug!(
            user_id = %user.id,
            content_id = %content.id,
            word_count = content.word_count,
            "Daily content stored"
        );

        Ok(UserOutcome::Generated)
    }

    /// Users who skipped onboarding get an empty profile and zero progress
    async fn load_context(&self, user: &User) -> Result<(UserContext, UserProfile), GenerationError> {
        let profile = self
            .user_repo
            .find_profile(user.id)
            .await?
            .unwrap_or_else(|| UserProfile::empty(user.id));
        let progress = self
            .user_repo
            .find_progress(user.id)
            .await?
            .unwrap_or_else(|| UserProgress::empty(user.id));

        let ctx = UserContext::build(user, &profile, &progress, Utc::now());
        Ok((ctx, profile))
    }

    async fn enqueue_audio(
        &self,
        content: &DailyContent,
        profile: &UserProfile,
    ) -> Result<(), GenerationError> {
        let job = NewAudioJob {
            user_id: content.user_id,
            daily_content_id: Some(content.id),
            script: content.script.clone(),
            scheduled_for: Utc::now(),
            voice_settings: VoiceSettings::from_profile_json(profile.voice_settings.as_ref()),
        };

        self.queue_service
            .enqueue(job)
            .await
            .map_err(|e| GenerationError::Dependency(e.to_string()))?;
        Ok(())
    }
}
