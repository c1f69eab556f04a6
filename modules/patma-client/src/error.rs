use thiserror::Error;

pub type Result<T> = std::result::Result<T, PatmaError>;

#[derive(Debug, Error)]
pub enum PatmaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PatmaError {
    fn from(err: reqwest::Error) -> Self {
        PatmaError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PatmaError {
    fn from(err: serde_json::Error) -> Self {
        PatmaError::Parse(err.to_string())
    }
}
