use thiserror::Error;

/// Application-level errors surfaced by the API layer.
#[derive(Debug, Error)]
pub enum HearthError {
    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
