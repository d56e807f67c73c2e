use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("llm call failed: {0}")]
    Llm(String),
    #[error("llm returned an unusable response: {0}")]
    InvalidResponse(String),
    #[error("script has {words} words ({minutes:.2} min at 155 wpm), expected 4.5-5.5 min")]
    WordCount { words: usize, minutes: f64 },
    #[error("template variable '{0}' has no value")]
    MissingVariable(String),
    #[error("user not found")]
    UserNotFound,
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl From<AppError> for GenerationError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => GenerationError::UserNotFound,
            _ => GenerationError::Dependency(err.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::UserNotFound => AppError::NotFound("User not found".to_string()),
            GenerationError::Dependency(msg) => AppError::Internal(msg),
            other => AppError::Generation(other.to_string()),
        }
    }
}
