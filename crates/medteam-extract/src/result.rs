//! Extraction result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResult {
    /// The extracted text content
    pub text: String,

    /// Source path
    pub source: String,

    /// Extracted text length in characters
    pub text_length: usize,

    /// Number of pages in the document
    pub page_count: usize,

    /// Document title from the PDF info dictionary
    pub title: Option<String>,

    /// Other info-dictionary entries (author, subject, ...)
    pub metadata: HashMap<String, String>,
}

impl ExtractResult {
    /// Create a new extraction result
    pub fn new(text: String, source: String) -> Self {
        let text_length = text.chars().count();
        Self {
            text,
            source,
            text_length,
            page_count: 0,
            title: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_page_count(mut self, pages: usize) -> Self {
        self.page_count = pages;
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut result: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        result.push_str("...");
    }
    result
}
