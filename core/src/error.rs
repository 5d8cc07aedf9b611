//! Error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed structural validation; holds the joined violations.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target host could not be reached.
    #[error("Server {0} is unreachable. Connection timed out.")]
    Unreachable(String),

    /// Credentials were rejected for the given username.
    #[error("Authentication failed for user '{0}'. Access denied.")]
    AuthenticationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Advisor error: {0}")]
    AdvisorError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HttpError(err.to_string())
    }
}
