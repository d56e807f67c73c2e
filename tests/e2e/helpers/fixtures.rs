use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use powerpulse_backend::domain::{
    queue::JobStatus,
    tts::VoiceSettings,
    user::{SubscriptionStatus, User},
};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

pub struct TestFixtures {
    pool: PgPool,
}

impl TestFixtures {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, email: &str, status: SubscriptionStatus) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, subscription_status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(email.split('@').next().unwrap_or_default())
        .bind(status.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn create_active_user(&self, email: &str) -> Result<User> {
        self.create_user(email, SubscriptionStatus::Active).await
    }

    pub async fn create_profile(
        &self,
        user_id: Uuid,
        pain_points: &[&str],
        voice_settings: Option<serde_json::Value>,
    ) -> Result<()> {
        let pain_points: Vec<String> = pain_points.iter().map(|p| p.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, pain_points, goals, learning_style, energy_level, voice_settings)
            VALUES ($1, $2, $3, 'gentle', 6, $4)
            "#,
        )
        .bind(user_id)
        .bind(&pain_points)
        .bind(vec!["build a morning routine".to_string()])
        .bind(voice_settings)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create_progress(&self, user_id: Uuid, current: i32, longest: i32, total: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_progress (user_id, current_streak, longest_streak, total_days_active)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(current)
        .bind(longest)
        .bind(total)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create_content(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        script: &str,
        audio_url: Option<&str>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO daily_content
                (id, user_id, content_date, title, script, key_points, stage, tone,
                 template_name, word_count, duration_seconds, audio_url)
            VALUES ($1, $2, $3, 'Fixture', $4, '[]', 'awareness', 'motivational',
                    'standard_daily', 775, 300, $5)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(date)
        .bind(script)
        .bind(audio_url)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_job(
        &self,
        user_id: Uuid,
        daily_content_id: Option<Uuid>,
        script: &str,
        status: JobStatus,
        attempts: i32,
        scheduled_for: DateTime<Utc>,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO audio_generation_queue
                (id, user_id, daily_content_id, script, scheduled_for, voice_settings,
                 status, attempts, next_attempt_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(daily_content_id)
        .bind(script)
        .bind(scheduled_for)
        .bind(Json(VoiceSettings::default()))
        .bind(status.as_str())
        .bind(attempts)
        .bind(next_attempt_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn job_status(&self, job_id: Uuid) -> Result<(String, i32, Option<String>)> {
        let row: (String, i32, Option<String>) = sqlx::query_as(
            "SELECT status, attempts, audio_url FROM audio_generation_queue WHERE id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn content_audio_url(&self, content_id: Uuid) -> Result<Option<String>> {
        let url: Option<String> =
            sqlx::query_scalar("SELECT audio_url FROM daily_content WHERE id = $1")
                .bind(content_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(url)
    }

    pub async fn count_jobs_for_content(&self, content_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audio_generation_queue WHERE daily_content_id = $1",
        )
        .bind(content_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_content_on(&self, date: NaiveDate) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM daily_content WHERE content_date = $1")
                .bind(date)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
