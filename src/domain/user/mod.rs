pub mod model;

pub use model::{LearningStyle, SubscriptionStatus, User, UserProfile, UserProgress};

use crate::error::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Read access to subscribers and their onboarding data
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Users whose subscription is active or trialing
    async fn find_content_recipients(&self) -> AppResult<Vec<User>>;

    async fn find_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>>;

    async fn find_progress(&self, user_id: Uuid) -> AppResult<Option<UserProgress>>;
}
