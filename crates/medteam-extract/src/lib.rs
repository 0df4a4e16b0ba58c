//! # Medteam Extract
//!
//! Text extraction for case report documents.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────────┐
//! │  Case PDF   │ ──► │ PdfExtractor │ ──► │  ExtractResult  │
//! │ (on disk)   │     │ (per page)   │     │ (clean text)    │
//! └─────────────┘     └──────────────┘     └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use medteam_extract::{Extractor, PdfExtractor};
//!
//! let result = PdfExtractor::default().extract("uploads/case.pdf").await?;
//! println!("{} chars", result.text_length);
//! ```

pub mod config;
pub mod error;
pub mod pdf;
pub mod result;

pub use config::ExtractorConfig;
pub use error::{ExtractError, Result};
pub use pdf::PdfExtractor;
pub use result::{preview, ExtractResult};

/// Common trait for document extractors
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    /// Extract text from the document at `source`.
    ///
    /// Fails when the document is missing, unreadable, or yields no text.
    async fn extract(&self, source: &str) -> Result<ExtractResult>;
}
