//! Medteam Agents - specialist clinical agents over a hosted language model
//!
//! A case flows strictly left to right:
//!
//! ```text
//! raw text ─► ReportStructurer ─► StructuredReport
//!                                      │
//!                 ┌────────────────────┼────────────────────┐
//!                 ▼                    ▼                    ▼
//!           Cardiologist         Psychologist         Pulmonologist
//!                 └────────────────────┼────────────────────┘
//!                                      ▼
//!                              AssessmentBundle ─► Synthesizer ─► FinalSummary
//! ```
//!
//! Each agent is one prompt-templated call through a [`ChatBackend`]. The
//! three specialists run concurrently and join all-or-nothing.
//!
//! # Example
//!
//! ```no_run
//! use medteam_agents::{MedicalTeam, ReportStructurer};
//! use medteam_llm::OpenAiClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(OpenAiClient::new(&Default::default())?);
//!     let report = ReportStructurer::new(backend.clone())
//!         .structure("Patient reports chest pain")
//!         .await?;
//!     let outcome = MedicalTeam::new(backend).evaluate(report).await?;
//!     println!("{}", outcome.summary);
//!     Ok(())
//! }
//! ```
//!
//! [`ChatBackend`]: medteam_llm::ChatBackend

pub mod errors;
pub mod orchestrator;
pub mod prompts;
pub mod role;
pub mod specialist;
pub mod structurer;
pub mod synthesizer;
pub mod types;

pub use errors::{AgentError, Result, Stage};
pub use orchestrator::{CaseOutcome, MedicalTeam};
pub use role::AgentRole;
pub use specialist::SpecialistAgent;
pub use structurer::ReportStructurer;
pub use synthesizer::Synthesizer;
pub use types::{AgentAssessment, AssessmentBundle, FinalSummary, StructuredReport};

#[cfg(test)]
pub(crate) mod test_support;
