//! Multidisciplinary synthesizer - consensus over the three assessments

use crate::errors::{AgentError, Result, Stage};
use crate::prompts::{team_input, TEAM_PROMPT};
use crate::types::{AssessmentBundle, FinalSummary};
use medteam_llm::{ChatBackend, ChatMessage};
use std::sync::Arc;

pub struct Synthesizer {
    backend: Arc<dyn ChatBackend>,
}

impl Synthesizer {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Produce the consensus summary for a complete bundle.
    ///
    /// An incomplete bundle is rejected before any backend call. Exactly one
    /// call otherwise; nothing is cached.
    pub async fn run(&self, bundle: &AssessmentBundle) -> Result<FinalSummary> {
        bundle.validate()?;

        tracing::info!(model = self.backend.model(), "Running multidisciplinary synthesis");

        let messages = [
            ChatMessage::system(TEAM_PROMPT),
            ChatMessage::user(team_input(bundle.iter())),
        ];
        let completion = self
            .backend
            .complete(&messages)
            .await
            .map_err(|e| AgentError::call(Stage::Synthesis, e))?;

        Ok(FinalSummary::new(completion.content))
    }
}
