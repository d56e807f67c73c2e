use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("speech provider error: {0}")]
    Provider(String),
    #[error("speech provider returned no audio")]
    EmptyAudio,
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::Invalid(msg) => AppError::BadRequest(msg),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}
