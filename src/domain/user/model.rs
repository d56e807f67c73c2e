use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    /// Only paying or trialing subscribers get daily content
    pub fn receives_content(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Trialing => write!(f, "trialing"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Direct,
    Gentle,
    Tough,
    Story,
}

impl LearningStyle {
    /// How the coach should sound for this style, fed into prompts
    pub fn coaching_hint(&self) -> &'static str {
        match self {
            LearningStyle::Direct => "direct and practical, no fluff",
            LearningStyle::Gentle => "gentle, warm and encouraging",
            LearningStyle::Tough => "tough-love, challenging and no excuses",
            LearningStyle::Story => "story-driven, teaching through short narratives",
        }
    }
}

impl std::fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningStyle::Direct => write!(f, "direct"),
            LearningStyle::Gentle => write!(f, "gentle"),
            LearningStyle::Tough => write!(f, "tough"),
            LearningStyle::Story => write!(f, "story"),
        }
    }
}

/// Answers collected by the onboarding quiz
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub pain_points: Vec<String>,
    pub goals: Vec<String>,
    pub learning_style: LearningStyle,
    pub energy_level: i32,
    pub voice_settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProgress {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub total_days_active: i32,
    pub last_active_date: Option<NaiveDate>,
}

impl UserProgress {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            total_days_active: 0,
            last_active_date: None,
        }
    }
}

impl UserProfile {
    /// Profile used for users who skipped the onboarding quiz
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            pain_points: Vec::new(),
            goals: Vec::new(),
            learning_style: LearningStyle::Direct,
            energy_level: 5,
            voice_settings: None,
        }
    }
}
