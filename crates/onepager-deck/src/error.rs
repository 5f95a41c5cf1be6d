//! Error types for deck extraction.

use onepager_ooxml::OoxmlError;
use thiserror::Error;

/// Result type for deck operations
pub type Result<T> = std::result::Result<T, DeckError>;

/// Errors that can occur while building the deck model
///
/// All of them are structural: they abort evaluation of the document version.
#[derive(Error, Debug)]
pub enum DeckError {
    /// Archive or XML failure (corrupt zip, missing entry, malformed part)
    #[error(transparent)]
    Ooxml(#[from] OoxmlError),

    /// No slide -> layout -> master -> theme chain exists for a slide
    #[error("Theme not found for slide {slide}")]
    ThemeNotFound { slide: String },

    /// The language classifier failed
    #[error("Language classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    /// A blocking extraction task panicked or was cancelled
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl DeckError {
    /// Create a theme not found error
    pub fn theme_not_found(slide: impl Into<String>) -> Self {
        Self::ThemeNotFound {
            slide: slide.into(),
        }
    }
}

/// Failure reported by a [`crate::LanguageClassifier`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ClassifierError(pub String);
