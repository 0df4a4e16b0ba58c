//! The backend seam

use crate::errors::Result;
use crate::types::{ChatMessage, Completion};
use async_trait::async_trait;

/// A chat-completion capable language model.
///
/// Implementations issue exactly one request per `complete` call and never
/// retry. A successful [`Completion`] always carries non-empty text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier, for logging
    fn model(&self) -> &str;

    /// Send the conversation and return the assistant reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion>;
}
