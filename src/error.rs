use thiserror::Error;

/// The message shown to users for any remote failure that is not one of the
/// two specific empty-result cases. Details go to the log, not the user.
pub const GENERATION_FAILED: &str = "Failed to generate image";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("{0}")]
    GenerationError(String),
}

impl StudioError {
    /// Whether this error comes from user input and is fixable by correcting
    /// it, as opposed to a configuration or remote failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, StudioError::ValidationError(_))
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
