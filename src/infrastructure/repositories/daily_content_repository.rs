use crate::domain::content::{
    DailyContent, DailyContentRepository, GeneratedContent, MissingAudioItem,
};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgDailyContentRepository {
    pool: Arc<DbPool>,
}

impl PgDailyContentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DailyContentRepository for PgDailyContentRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        content_date: NaiveDate,
        content: &GeneratedContent,
    ) -> AppResult<DailyContent> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, DailyContent>(
            r#"
            INSERT INTO daily_content
                (id, user_id, content_date, title, script, key_points, stage, tone,
                 template_name, word_count, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content_date)
        .bind(&content.title)
        .bind(&content.script)
        .bind(Json(&content.key_points))
        .bind(content.stage.as_str())
        .bind(content.tone.as_str())
        .bind(&content.template_name)
        .bind(content.word_count)
        .bind(content.duration_seconds)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    async fn replace_for_date(
        &self,
        user_id: Uuid,
        content_date: NaiveDate,
        content: &GeneratedContent,
    ) -> AppResult<DailyContent> {
        let pool = self.pool.as_ref();
        let mut tx = pool.begin().await?;

        // Outstanding jobs would otherwise voice the discarded script
        let dropped_jobs = sqlx::query(
            r#"
            DELETE FROM audio_generation_queue
            WHERE status <> 'completed'
              AND daily_content_id IN (
                  SELECT id FROM daily_content WHERE user_id = $1 AND content_date = $2
              )
            "#,
        )
        .bind(user_id)
        .bind(content_date)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM daily_content WHERE user_id = $1 AND content_date = $2")
            .bind(user_id)
            .bind(content_date)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, DailyContent>(
            r#"
            INSERT INTO daily_content
                (id, user_id, content_date, title, script, key_points, stage, tone,
                 template_name, word_count, duration_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content_date)
        .bind(&content.title)
        .bind(&content.script)
        .bind(Json(&content.key_points))
        .bind(content.stage.as_str())
        .bind(content.tone.as_str())
        .bind(&content.template_name)
        .bind(content.word_count)
        .bind(content.duration_seconds)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            content_date = %content_date,
            dropped_jobs = dropped_jobs,
            "Daily content replaced"
        );

        Ok(row)
    }

    async fn exists_for_user_on(&self, user_id: Uuid, content_date: NaiveDate) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM daily_content WHERE user_id = $1 AND content_date = $2)",
        )
        .bind(user_id)
        .bind(content_date)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DailyContent>> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, DailyContent>("SELECT * FROM daily_content WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row)
    }

    async fn find_missing_audio(&self, content_date: NaiveDate) -> AppResult<Vec<MissingAudioItem>> {
        let pool = self.pool.as_ref();
        let items = sqlx::query_as::<_, MissingAudioItem>(
            r#"
            SELECT dc.id AS content_id, dc.user_id, u.email, dc.script, p.voice_settings
            FROM daily_content dc
            JOIN users u ON u.id = dc.user_id
            LEFT JOIN user_profiles p ON p.user_id = dc.user_id
            WHERE dc.content_date = $1
              AND dc.audio_url IS NULL
              AND NOT EXISTS (
                  SELECT 1 FROM audio_generation_queue q
                  WHERE q.daily_content_id = dc.id
                    AND q.status IN ('pending', 'processing', 'failed')
              )
            ORDER BY dc.created_at
            "#,
        )
        .bind(content_date)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    async fn attach_audio(
        &self,
        id: Uuid,
        audio_url: &str,
        duration_seconds: f64,
        size_bytes: i64,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            UPDATE daily_content
            SET audio_url = $2, audio_duration_seconds = $3, audio_size_bytes = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(audio_url)
        .bind(duration_seconds)
        .bind(size_bytes)
        .execute(pool)
        .await?;

        Ok(())
    }
}
