use crate::domain::queue::{AudioJob, AudioQueueRepository, JobStatus, NewAudioJob, QueueStats};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgAudioQueueRepository {
    pool: Arc<DbPool>,
}

impl PgAudioQueueRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AudioQueueRepository for PgAudioQueueRepository {
    async fn enqueue(&self, job: NewAudioJob) -> AppResult<AudioJob> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, AudioJob>(
            r#"
            INSERT INTO audio_generation_queue
                (id, user_id, daily_content_id, script, scheduled_for, voice_settings, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.user_id)
        .bind(job.daily_content_id)
        .bind(&job.script)
        .bind(job.scheduled_for)
        .bind(Json(&job.voice_settings))
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn claim_due(
        &self,
        limit: i64,
        max_retries: i32,
        lease: Duration,
    ) -> AppResult<Vec<AudioJob>> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        // Rows locked by a concurrent claimer are skipped, not waited on
        let jobs = sqlx::query_as::<_, AudioJob>(
            r#"
            UPDATE audio_generation_queue
            SET status = 'processing', locked_until = $4, updated_at = $1
            WHERE id IN (
                SELECT id FROM audio_generation_queue
                WHERE (
                        status IN ('pending', 'failed')
                        AND attempts < $3
                        AND scheduled_for <= $1
                        AND (next_attempt_at IS NULL OR next_attempt_at <= $1)
                      )
                   OR (status = 'processing' AND locked_until < $1)
                ORDER BY scheduled_for
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(limit)
        .bind(max_retries)
        .bind(now + lease)
        .fetch_all(pool)
        .await?;

        Ok(jobs)
    }

    async fn complete(&self, job_id: Uuid, audio_url: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE audio_generation_queue
            SET status = 'completed', audio_url = $2, processed_at = NOW(),
                locked_until = NULL, error = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(audio_url)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn fail(
        &self,
        job_id: Uuid,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE audio_generation_queue
            SET status = 'failed', attempts = attempts + 1, error = $2,
                next_attempt_at = $3, processed_at = NOW(), locked_until = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(error)
        .bind(next_attempt_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn insert_failed(
        &self,
        job: NewAudioJob,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> AppResult<AudioJob> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, AudioJob>(
            r#"
            INSERT INTO audio_generation_queue
                (id, user_id, daily_content_id, script, scheduled_for, voice_settings,
                 status, attempts, error, next_attempt_at, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'failed', 1, $7, $8, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.user_id)
        .bind(job.daily_content_id)
        .bind(&job.script)
        .bind(job.scheduled_for)
        .bind(Json(&job.voice_settings))
        .bind(error)
        .bind(next_attempt_at)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn delete_completed_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            "DELETE FROM audio_generation_queue WHERE status = 'completed' AND processed_at < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn reset_failed(&self, max_retries: i32) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE audio_generation_queue
            SET status = 'pending', attempts = 0, error = NULL, next_attempt_at = NULL,
                updated_at = NOW()
            WHERE status = 'failed' AND attempts <= $1
            "#,
        )
        .bind(max_retries)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> AppResult<QueueStats> {
        let pool = self.pool.as_ref();
        let rows: Vec<(JobStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM audio_generation_queue GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let mut stats = QueueStats::default();
        for (status, count) in rows {
            match status {
                JobStatus::Pending => stats.pending = count,
                JobStatus::Processing => stats.processing = count,
                JobStatus::Completed => stats.completed = count,
                JobStatus::Failed => stats.failed = count,
            }
        }
        Ok(stats)
    }
}
