use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        content::{DailyContent, DailyContentServiceApi, GenerationSummary},
        queue::{BatchSummary, QueueServiceApi, QueueStats},
    },
    error::AppResult,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessAudioResponse {
    pub queue: BatchSummary,
    pub missing_audio: BatchSummary,
    pub stats: QueueStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaintenanceResponse {
    pub retried: u64,
    pub cleaned: u64,
}

/// Request for POST /api/internal/content/regenerate
#[derive(Debug, Serialize, Deserialize)]
pub struct RegenerateRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub negative_feedback: bool,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

pub struct CronController {
    queue_service: Arc<dyn QueueServiceApi>,
    daily_content_service: Arc<dyn DailyContentServiceApi>,
    job_retention_days: i64,
}

impl CronController {
    pub fn new(
        queue_service: Arc<dyn QueueServiceApi>,
        daily_content_service: Arc<dyn DailyContentServiceApi>,
        job_retention_days: i64,
    ) -> Self {
        Self {
            queue_service,
            daily_content_service,
            job_retention_days,
        }
    }

    /// GET /api/cron/process-audio - Run one queue batch, then the missing audio sweep
    pub async fn process_audio(
        State(controller): State<Arc<CronController>>,
    ) -> AppResult<Json<ProcessAudioResponse>> {
        let queue = controller.queue_service.process_pending_jobs().await?;
        let missing_audio = controller.queue_service.generate_missing_audio(None).await?;
        let stats = controller.queue_service.queue_stats().await?;

        Ok(Json(ProcessAudioResponse {
            queue,
            missing_audio,
            stats,
        }))
    }

    /// GET /api/cron/generate-content - Create today's content for all subscribers
    pub async fn generate_content(
        State(controller): State<Arc<CronController>>,
    ) -> AppResult<Json<GenerationSummary>> {
        let today = Utc::now().date_naive();
        let summary = controller
            .daily_content_service
            .generate_for_date(today)
            .await?;
        Ok(Json(summary))
    }

    /// GET /api/cron/maintenance - Retry failed jobs and drop old completed ones
    pub async fn maintenance(
        State(controller): State<Arc<CronController>>,
    ) -> AppResult<Json<MaintenanceResponse>> {
        let retried = controller.queue_service.retry_failed_jobs().await?;
        let cleaned = controller
            .queue_service
            .cleanup_old_jobs(controller.job_retention_days)
            .await?;

        Ok(Json(MaintenanceResponse { retried, cleaned }))
    }

    /// POST /api/internal/content/regenerate
    pub async fn regenerate(
        State(controller): State<Arc<CronController>>,
        Json(request): Json<RegenerateRequest>,
    ) -> AppResult<Json<DailyContent>> {
        let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
        let content = controller
            .daily_content_service
            .regenerate_for_user(request.user_id, date, request.negative_feedback)
            .await?;
        Ok(Json(content))
    }
}
