//! Upload file naming

use chrono::{DateTime, Local};

const FALLBACK_NAME: &str = "upload.pdf";

/// Whether `filename` has a `.pdf` extension (any case)
pub fn is_pdf(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// anything else is dropped. Leading dots and underscores are stripped so
/// the result can never be hidden or traverse directories.
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on some platforms send the full client path
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            cleaned.push(c);
        } else if c.is_whitespace() {
            cleaned.push('_');
        }
    }

    let cleaned = cleaned.trim_start_matches(['.', '_']);
    if cleaned.is_empty() || !is_pdf(cleaned) {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// `<YYYYMMDD_HHMMSS>_<sanitized name>`
pub fn stored_name(filename: &str, now: DateTime<Local>) -> String {
    format!("{}_{}", file_timestamp(now), sanitize_filename(filename))
}

/// Timestamp fragment used in stored and rendered file names
pub fn file_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
