//! Error types for text extraction

use std::path::PathBuf;
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The referenced file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file could not be parsed as a PDF
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The document parsed but contains no extractable text
    #[error("No text could be extracted from PDF")]
    Empty,

    /// Content too large
    #[error("Content too large: {size} chars exceeds max {max} chars")]
    ContentTooLarge { size: usize, max: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Extraction task panicked or was cancelled
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for ExtractError {
    fn from(err: lopdf::Error) -> Self {
        ExtractError::Pdf(err.to_string())
    }
}
