use crate::domain::user::{LearningStyle, User, UserProfile, UserProgress};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Every daily session is sized for five minutes of speech
pub const TARGET_DURATION_SECONDS: i32 = 300;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Awareness,
    Consideration,
    Decision,
    Retention,
}

impl Stage {
    pub fn from_total_days_active(total_days_active: u32) -> Self {
        match total_days_active {
            0..=6 => Stage::Awareness,
            7..=20 => Stage::Consideration,
            21..=59 => Stage::Decision,
            _ => Stage::Retention,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Awareness => "awareness",
            Stage::Consideration => "consideration",
            Stage::Decision => "decision",
            Stage::Retention => "retention",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Motivational,
    Educational,
    Celebratory,
    Supportive,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Motivational => "motivational",
            Tone::Educational => "educational",
            Tone::Celebratory => "celebratory",
            Tone::Supportive => "supportive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "motivational" => Some(Tone::Motivational),
            "educational" => Some(Tone::Educational),
            "celebratory" => Some(Tone::Celebratory),
            "supportive" => Some(Tone::Supportive),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

/// Everything the generator knows about a user at generation time.
///
/// Rebuilt from the user, profile and progress rows on every generation;
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Uuid,
    pub name: String,
    pub pain_points: Vec<String>,
    pub goals: Vec<String>,
    pub learning_style: LearningStyle,
    pub energy_level: u8,
    pub stage: Stage,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_days_active: u32,
    pub time_of_day: TimeOfDay,
    pub returning_after_break: bool,
}

impl UserContext {
    pub fn build(
        user: &User,
        profile: &UserProfile,
        progress: &UserProgress,
        now: DateTime<Utc>,
    ) -> Self {
        let current_streak = progress.current_streak.max(0) as u32;
        let longest_streak = progress.longest_streak.max(0) as u32;
        let total_days_active = progress.total_days_active.max(0) as u32;

        Self {
            user_id: user.id,
            name: user.name.clone(),
            pain_points: profile.pain_points.clone(),
            goals: profile.goals.clone(),
            learning_style: profile.learning_style,
            energy_level: profile.energy_level.clamp(1, 10) as u8,
            stage: Stage::from_total_days_active(total_days_active),
            current_streak,
            longest_streak,
            total_days_active,
            time_of_day: TimeOfDay::from_hour(now.hour()),
            returning_after_break: current_streak == 0 && longest_streak > 0,
        }
    }
}

/// Output of one generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub script: String,
    pub duration_seconds: i32,
    pub key_points: Vec<String>,
    pub stage: Stage,
    pub tone: Tone,
    pub template_name: String,
    pub word_count: i32,
}

/// Persisted daily content row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyContent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_date: NaiveDate,
    pub title: String,
    pub script: String,
    pub key_points: sqlx::types::Json<Vec<String>>,
    pub stage: String,
    pub tone: String,
    pub template_name: String,
    pub word_count: i32,
    pub duration_seconds: i32,
    pub audio_url: Option<String>,
    pub audio_duration_seconds: Option<f64>,
    pub audio_size_bytes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A daily content row that still needs audio, joined with its owner
#[derive(Debug, Clone, FromRow)]
pub struct MissingAudioItem {
    pub content_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub script: String,
    pub voice_settings: Option<serde_json::Value>,
}
