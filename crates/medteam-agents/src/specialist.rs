//! Specialist agent - one role, one backend call

use crate::errors::{AgentError, Result, Stage};
use crate::prompts;
use crate::role::AgentRole;
use crate::types::{AgentAssessment, StructuredReport};
use medteam_llm::{ChatBackend, ChatMessage, LlmError};
use std::sync::Arc;

/// A role-scoped wrapper around a single language-model call.
///
/// Roles differ only in their instruction template; the invocation is the
/// same for all of them.
pub struct SpecialistAgent {
    role: AgentRole,
    report: Arc<StructuredReport>,
    backend: Arc<dyn ChatBackend>,
}

impl SpecialistAgent {
    pub fn new(
        role: AgentRole,
        report: Arc<StructuredReport>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            role,
            report,
            backend,
        }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub fn system_prompt(&self) -> &'static str {
        prompts::specialist_prompt(self.role)
    }

    /// Issue exactly one backend request and return the raw reply.
    ///
    /// No retries; a failure names this agent's role.
    pub async fn run(&self) -> Result<AgentAssessment> {
        tracing::info!(role = %self.role, model = self.backend.model(), "Running specialist agent");

        let messages = [
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(prompts::specialist_input(self.report.as_str())),
        ];

        let completion = self.backend.complete(&messages).await.map_err(|e| {
            tracing::warn!(role = %self.role, error = %e, "Specialist agent failed");
            AgentError::call(Stage::Specialist(self.role), e)
        })?;

        if completion.content.trim().is_empty() {
            tracing::warn!(role = %self.role, "Specialist agent returned no text");
            return Err(AgentError::call(
                Stage::Specialist(self.role),
                LlmError::EmptyResponse,
            ));
        }

        tracing::debug!(role = %self.role, chars = completion.content.len(), "Specialist agent done");
        Ok(AgentAssessment::new(self.role, completion.content))
    }
}
