use std::io;
use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required model artifact (scaler or classifier) is missing or unreadable.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The risk engine never initialized, so no assessment can be served.
    #[error("Risk engine not initialized: {0}")]
    EngineUnavailable(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., out-of-range questionnaire values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents failures of the remote explanation backend.
    #[error("Explanation backend error: {0}")]
    Backend(String),

    /// Represents encryption or decryption failures.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Represents failures while persisting assessments.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Backend(format!("HTTP error: {}", err))
    }
}
