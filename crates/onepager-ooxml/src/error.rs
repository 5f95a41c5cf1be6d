//! Error types for OOXML package access

use thiserror::Error;

/// Errors that can occur while reading an OOXML package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The byte stream is not a valid zip container
    #[error("Corrupt archive: {0}")]
    CorruptArchive(#[from] zip::result::ZipError),

    /// A mandatory part is absent from the package
    #[error("Required entry not found: {0}")]
    MissingEntry(String),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error reading entry contents
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
