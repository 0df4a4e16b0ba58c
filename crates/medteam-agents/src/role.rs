//! The fixed set of specialist roles

use serde::{Deserialize, Serialize};

/// Clinical specialty an agent assesses a case from.
///
/// The set is closed: every run consults exactly these three roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Cardiovascular assessment
    Cardiologist,
    /// Psychological and psychiatric assessment
    Psychologist,
    /// Respiratory assessment
    Pulmonologist,
}

impl AgentRole {
    /// Every role, in report order
    pub const ALL: [AgentRole; 3] = [
        AgentRole::Cardiologist,
        AgentRole::Psychologist,
        AgentRole::Pulmonologist,
    ];

    /// Lower-case name used in URLs and JSON fields
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Cardiologist => "cardiologist",
            AgentRole::Psychologist => "psychologist",
            AgentRole::Pulmonologist => "pulmonologist",
        }
    }

    /// Capitalized name used in headings and messages
    pub fn title(&self) -> &'static str {
        match self {
            AgentRole::Cardiologist => "Cardiologist",
            AgentRole::Psychologist => "Psychologist",
            AgentRole::Pulmonologist => "Pulmonologist",
        }
    }

    /// Parse a role name, ignoring case
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cardiologist" => Some(AgentRole::Cardiologist),
            "psychologist" => Some(AgentRole::Psychologist),
            "pulmonologist" => Some(AgentRole::Pulmonologist),
            _ => None,
        }
    }

    /// Names accepted by [`AgentRole::from_str`]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|r| r.name()).collect()
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
