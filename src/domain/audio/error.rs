use crate::error::AppError;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("audio buffer is empty")]
    Empty,
    #[error("audio is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("audio lasts {duration:.1}s, expected {min:.0}-{max:.0}s")]
    DurationOutOfRange { duration: f64, min: f64, max: f64 },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}
