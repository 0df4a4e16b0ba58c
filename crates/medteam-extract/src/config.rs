//! Extractor configuration

use serde::{Deserialize, Serialize};

/// Configuration for text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum text length to accept (in characters)
    pub max_length: usize,

    /// Whether to keep line structure; otherwise every whitespace run becomes one space
    pub preserve_lines: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_length: 1_000_000,
            preserve_lines: true,
        }
    }
}

impl ExtractorConfig {
    /// Set the maximum accepted text length
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Keep or flatten line breaks
    pub fn with_preserve_lines(mut self, preserve: bool) -> Self {
        self.preserve_lines = preserve;
        self
    }
}
