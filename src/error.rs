//! Error types for the intent bot

use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Reply sent when an upstream API cannot be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "unable to connect to the API servers";

#[derive(Error, Debug)]
pub enum BotError {

    // =============================
    // Dialog Errors
    // =============================

    #[error("unable to find the address")]
    LocationNotFound,

    #[error("exceeded request limit")]
    RateLimited,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("{0}")]
    UpstreamError(String),

    #[error("Invalid entities: {0}")]
    InvalidEntities(String),

    // =============================
    // Process Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BotError {
    /// Text shown to the user when a dialog fails with this error.
    pub fn user_message(&self) -> String {
        match self {
            BotError::NetworkUnreachable(_) => UNREACHABLE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            BotError::NetworkUnreachable(e.to_string())
        } else {
            BotError::UpstreamError(e.to_string())
        }
    }
}
