//! Report structurer - raw extracted text to a normalized report

use crate::errors::{AgentError, Result, Stage};
use crate::prompts::{structurer_input, STRUCTURER_PROMPT};
use crate::types::StructuredReport;
use medteam_llm::{ChatBackend, ChatMessage};
use std::sync::Arc;

pub struct ReportStructurer {
    backend: Arc<dyn ChatBackend>,
}

impl ReportStructurer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Normalize raw case text with one backend call.
    ///
    /// Output is not deterministic across calls, but is never empty.
    pub async fn structure(&self, raw_text: &str) -> Result<StructuredReport> {
        if raw_text.trim().is_empty() {
            return Err(AgentError::empty("text"));
        }

        tracing::info!(chars = raw_text.len(), "Structuring medical report");

        let messages = [
            ChatMessage::system(STRUCTURER_PROMPT),
            ChatMessage::user(structurer_input(raw_text)),
        ];
        let completion = self
            .backend
            .complete(&messages)
            .await
            .map_err(|e| AgentError::call(Stage::Structuring, e))?;

        StructuredReport::new(completion.content)
    }
}
