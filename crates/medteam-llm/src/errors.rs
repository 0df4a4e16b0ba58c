//! Error types for backend calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not set (OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("LLM API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LlmError>;
