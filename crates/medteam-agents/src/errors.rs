//! Error types for the agent pipeline

use crate::role::AgentRole;
use medteam_llm::LlmError;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Pipeline stage that issued a backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Structuring,
    Specialist(AgentRole),
    Synthesis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Structuring => write!(f, "Report structuring"),
            Stage::Specialist(role) => write!(f, "{} agent", role.title()),
            Stage::Synthesis => write!(f, "Multidisciplinary summary"),
        }
    }
}

/// Agent execution error
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The backend call for a stage failed; never retried
    #[error("{stage} failed: {source}")]
    Call {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    /// A caller-supplied input is missing or empty
    #[error("{field} {reason}")]
    InvalidInput { field: String, reason: String },
}

impl AgentError {
    pub fn call(stage: Stage, source: LlmError) -> Self {
        AgentError::Call { stage, source }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        AgentError::InvalidInput {
            field: field.into(),
            reason: "cannot be empty".to_string(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        AgentError::InvalidInput {
            field: field.into(),
            reason: "is missing".to_string(),
        }
    }

    /// Stage whose backend call failed, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AgentError::Call { stage, .. } => Some(*stage),
            AgentError::InvalidInput { .. } => None,
        }
    }

    /// Role whose specialist call failed, if any
    pub fn failed_role(&self) -> Option<AgentRole> {
        match self.stage() {
            Some(Stage::Specialist(role)) => Some(role),
            _ => None,
        }
    }
}
