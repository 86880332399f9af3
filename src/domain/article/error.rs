use crate::error::AppError;
use crate::infrastructure::synthesis::SynthesisError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("audio generation already in progress")]
    InProgress,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("audio storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for GenerationError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => GenerationError::Invalid(msg),
            _ => GenerationError::Store(err.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InProgress => {
                AppError::Conflict("audio generation already in progress".to_string())
            }
            GenerationError::Invalid(msg) => AppError::BadRequest(msg),
            GenerationError::Synthesis(e) => AppError::ExternalService(e.to_string()),
            GenerationError::Storage(e) => AppError::Internal(e.to_string()),
            GenerationError::Store(msg) => AppError::Internal(msg),
            GenerationError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
