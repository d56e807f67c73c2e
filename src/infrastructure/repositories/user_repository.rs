use crate::domain::user::{User, UserProfile, UserProgress, UserRepository};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgUserRepository {
    pool: Arc<DbPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    async fn find_content_recipients(&self) -> AppResult<Vec<User>> {
        let pool = self.pool.as_ref();
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE subscription_status IN ('active', 'trialing')
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let pool = self.pool.as_ref();
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, pain_points, goals, learning_style, energy_level, voice_settings
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    async fn find_progress(&self, user_id: Uuid) -> AppResult<Option<UserProgress>> {
        let pool = self.pool.as_ref();
        let progress = sqlx::query_as::<_, UserProgress>(
            r#"
            SELECT user_id, current_streak, longest_streak, total_days_active, last_active_date
            FROM user_progress
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(progress)
    }
}
