//! PDF document text extraction

use crate::{config::ExtractorConfig, error::Result, ExtractError, ExtractResult, Extractor};
use lopdf::{Dictionary, Document, Object};
use std::path::{Path, PathBuf};

/// PDF document text extractor
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    config: ExtractorConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor with the given configuration
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract text from a PDF file path (blocking)
    pub fn extract_from_file(&self, path: &Path) -> Result<ExtractResult> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        let doc = Document::load(path)?;
        self.extract_from_document(&doc, path.to_string_lossy().to_string())
    }

    /// Extract text from PDF bytes (blocking)
    pub fn extract_from_bytes(&self, bytes: &[u8], source: String) -> Result<ExtractResult> {
        let doc = Document::load_mem(bytes)?;
        self.extract_from_document(&doc, source)
    }

    /// Extract text from a lopdf Document
    fn extract_from_document(&self, doc: &Document, source: String) -> Result<ExtractResult> {
        let mut text_parts: Vec<String> = Vec::new();
        let pages = doc.get_pages();

        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    let cleaned = self.clean_text(&page_text);
                    if !cleaned.is_empty() {
                        text_parts.push(cleaned);
                    }
                }
                Err(e) => {
                    tracing::warn!(page = page_num, error = %e, source = %source, "Skipping unreadable page");
                }
            }
        }

        let text = text_parts.join("\n\n");
        if text.is_empty() {
            return Err(ExtractError::Empty);
        }

        let size = text.chars().count();
        if size > self.config.max_length {
            return Err(ExtractError::ContentTooLarge {
                size,
                max: self.config.max_length,
            });
        }

        let mut result = ExtractResult::new(text, source).with_page_count(pages.len());

        if let Some(info) = info_dictionary(doc) {
            for (key, field) in [("Title", "title"), ("Author", "author"), ("Subject", "subject")] {
                if let Some(value) = info.get(key.as_bytes()).ok().and_then(decode_pdf_string) {
                    result = if field == "title" {
                        result.with_title(value)
                    } else {
                        result.with_metadata(field, value)
                    };
                }
            }
        }

        tracing::debug!(
            pages = result.page_count,
            chars = result.text_length,
            "PDF text extracted"
        );
        Ok(result)
    }

    /// Collapse whitespace runs; keeps single line breaks when configured
    fn clean_text(&self, text: &str) -> String {
        if !self.config.preserve_lines {
            return text.split_whitespace().collect::<Vec<_>>().join(" ");
        }

        let mut lines: Vec<String> = Vec::new();
        for raw in text.lines() {
            let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
            lines.push(line);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, or single-byte)
fn decode_pdf_string(obj: &Object) -> Option<String> {
    let bytes = obj.as_str().ok()?;
    let text = if bytes.starts_with(&[0xFE, 0xFF]) {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|b| *b as char).collect()
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

#[async_trait::async_trait]
impl Extractor for PdfExtractor {
    /// Extract text from a PDF file path, off the async runtime
    async fn extract(&self, source: &str) -> Result<ExtractResult> {
        let path = PathBuf::from(source);
        if !path.exists() {
            return Err(ExtractError::NotFound(path));
        }

        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract_from_file(&path))
            .await
            .map_err(|e| ExtractError::Task(e.to_string()))?
    }
}
