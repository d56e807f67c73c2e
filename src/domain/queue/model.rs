use crate::domain::tts::VoiceSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// One row of `audio_generation_queue`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AudioJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub daily_content_id: Option<Uuid>,
    pub script: String,
    pub scheduled_for: DateTime<Utc>,
    pub voice_settings: Json<VoiceSettings>,
    pub status: JobStatus,
    pub attempts: i32,
    pub error: Option<String>,
    pub audio_url: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAudioJob {
    pub user_id: Uuid,
    pub daily_content_id: Option<Uuid>,
    pub script: String,
    pub scheduled_for: DateTime<Utc>,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: u32,
    pub failed: u32,
    pub skipped: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
}
