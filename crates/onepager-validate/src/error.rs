//! Error types for rule evaluation and orchestration

use onepager_deck::DeckError;
use thiserror::Error;

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidateError>;

/// Errors that abort the evaluation of one employee
///
/// Policy findings are never errors; they are returned as
/// [`crate::ValidationError`] values.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Structural failure of the document or the classifier
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// Error reading documents or writing reports
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored report could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file is not valid TOML for [`crate::config::Settings`]
    #[error("Settings error: {0}")]
    Settings(#[from] toml::de::Error),

    /// Document repository failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// Validation reporter failure
    #[error("Reporter error: {0}")]
    Reporter(String),
}
