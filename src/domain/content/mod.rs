pub mod daily;
pub mod error;
pub mod model;
pub mod selector;
pub mod service;
pub mod templates;

pub use daily::{DailyContentService, DailyContentServiceApi, GenerationSummary};
pub use error::GenerationError;
pub use model::{
    DailyContent, GeneratedContent, MissingAudioItem, Stage, TimeOfDay, Tone, UserContext,
};
pub use service::{ContentService, ContentServiceApi};

use crate::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Persistence for `daily_content` rows
#[async_trait]
pub trait DailyContentRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        content_date: NaiveDate,
        content: &GeneratedContent,
    ) -> AppResult<DailyContent>;

    /// Replace the user's row for a date with fresh content and no audio.
    /// Audio jobs still outstanding for the old row are dropped with it.
    async fn replace_for_date(
        &self,
        user_id: Uuid,
        content_date: NaiveDate,
        content: &GeneratedContent,
    ) -> AppResult<DailyContent>;

    async fn exists_for_user_on(&self, user_id: Uuid, content_date: NaiveDate) -> AppResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DailyContent>>;

    /// Rows for a date without audio and without an outstanding queue job
    async fn find_missing_audio(&self, content_date: NaiveDate) -> AppResult<Vec<MissingAudioItem>>;

    async fn attach_audio(
        &self,
        id: Uuid,
        audio_url: &str,
        duration_seconds: f64,
        size_bytes: i64,
    ) -> AppResult<()>;
}
