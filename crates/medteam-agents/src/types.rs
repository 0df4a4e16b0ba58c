//! Case entities passed between pipeline stages
//!
//! Every entity here is created once and never mutated. The dependency chain
//! is `StructuredReport -> AssessmentBundle -> FinalSummary`.

use crate::errors::{AgentError, Result};
use crate::role::AgentRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized case text shared by all specialists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredReport(String);

impl StructuredReport {
    /// Wrap report text; blank text is rejected
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AgentError::empty("structured report"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StructuredReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One specialist's free-text assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAssessment {
    pub role: AgentRole,
    pub text: String,
}

impl AgentAssessment {
    pub fn new(role: AgentRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Assessments keyed by role.
///
/// Only complete bundles (every role present, non-empty) are accepted by the
/// synthesizer; see [`AssessmentBundle::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentBundle {
    assessments: BTreeMap<AgentRole, String>,
}

impl AssessmentBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bundle from the three texts in role order
    pub fn from_texts(
        cardiologist: impl Into<String>,
        psychologist: impl Into<String>,
        pulmonologist: impl Into<String>,
    ) -> Self {
        let assessments = BTreeMap::from([
            (AgentRole::Cardiologist, cardiologist.into()),
            (AgentRole::Psychologist, psychologist.into()),
            (AgentRole::Pulmonologist, pulmonologist.into()),
        ]);
        Self { assessments }
    }

    /// Record one role's assessment.
    ///
    /// Each role owns exactly one slot; a second insert for the same role is
    /// rejected.
    pub fn insert(&mut self, assessment: AgentAssessment) -> Result<()> {
        if self.assessments.contains_key(&assessment.role) {
            return Err(AgentError::InvalidInput {
                field: assessment.role.name().to_string(),
                reason: "was assessed twice".to_string(),
            });
        }
        self.assessments.insert(assessment.role, assessment.text);
        Ok(())
    }

    pub fn get(&self, role: AgentRole) -> Option<&str> {
        self.assessments.get(&role).map(String::as_str)
    }

    /// Roles present, in role order
    pub fn roles(&self) -> Vec<AgentRole> {
        self.assessments.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    /// Iterate `(role, text)` in role order
    pub fn iter(&self) -> impl Iterator<Item = (AgentRole, &str)> {
        self.assessments.iter().map(|(r, t)| (*r, t.as_str()))
    }

    /// Whether every role is present with non-blank text
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check completeness, naming the first missing or blank role
    pub fn validate(&self) -> Result<()> {
        for role in AgentRole::ALL {
            match self.get(role) {
                None => return Err(AgentError::missing(role.name())),
                Some(text) if text.trim().is_empty() => {
                    return Err(AgentError::empty(role.name()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Consensus narrative produced from a complete bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalSummary(String);

impl FinalSummary {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for FinalSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
