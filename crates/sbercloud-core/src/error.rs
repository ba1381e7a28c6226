//! Error types for the SberCloud core library

use thiserror::Error;

/// Result type alias for SberCloud core operations
pub type SbercloudResult<T> = Result<T, SbercloudError>;

/// Main error type for configuration and client construction
#[derive(Error, Debug)]
pub enum SbercloudError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(String),
}

impl SbercloudError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<toml::de::Error> for SbercloudError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config(format!("invalid TOML: {}", error))
    }
}

impl From<reqwest::Error> for SbercloudError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}
