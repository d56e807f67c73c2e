use crate::domain::audio::ValidationError;
use crate::domain::tts::TtsError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QueueServiceError {
    #[error("repository error: {0}")]
    Repository(String),
    #[error(transparent)]
    Tts(#[from] TtsError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<AppError> for QueueServiceError {
    fn from(err: AppError) -> Self {
        QueueServiceError::Repository(err.to_string())
    }
}

impl From<QueueServiceError> for AppError {
    fn from(err: QueueServiceError) -> Self {
        match err {
            QueueServiceError::Repository(msg) => AppError::Internal(msg),
            QueueServiceError::Tts(e) => e.into(),
            QueueServiceError::Validation(e) => e.into(),
            QueueServiceError::Storage(msg) => AppError::Storage(msg),
        }
    }
}
