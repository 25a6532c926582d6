use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),
    #[error("file too large: {0}")]
    TooLarge(String),
    #[error("could not extract text: {0}")]
    Unreadable(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Unsupported(msg) => {
                AppError::BadRequest(format!("Unsupported file type: {}", msg))
            }
            ExtractionError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            ExtractionError::Unreadable(msg) => AppError::BadRequest(msg),
        }
    }
}
