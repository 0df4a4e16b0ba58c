//! Fan-out/fan-in over the specialist roles
//!
//! All specialists are dispatched concurrently against the same report. The
//! join is all-or-nothing: the first failure aborts the rest and no partial
//! bundle is ever returned.

use crate::errors::Result;
use crate::role::AgentRole;
use crate::specialist::SpecialistAgent;
use crate::synthesizer::Synthesizer;
use crate::types::{AgentAssessment, AssessmentBundle, FinalSummary, StructuredReport};
use futures::future::try_join_all;
use medteam_llm::ChatBackend;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Everything a consultation produced
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub report: Arc<StructuredReport>,
    pub bundle: AssessmentBundle,
    pub summary: FinalSummary,
}

/// The three specialists plus the synthesizer, over one backend
#[derive(Clone)]
pub struct MedicalTeam {
    backend: Arc<dyn ChatBackend>,
}

impl MedicalTeam {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Build the agent for one role
    pub fn agent(&self, role: AgentRole, report: Arc<StructuredReport>) -> SpecialistAgent {
        SpecialistAgent::new(role, report, self.backend.clone())
    }

    /// Run a single specialist
    pub async fn run_agent(
        &self,
        role: AgentRole,
        report: Arc<StructuredReport>,
    ) -> Result<AgentAssessment> {
        self.agent(role, report).run().await
    }

    /// Run every specialist concurrently and join their assessments.
    ///
    /// Completion order is irrelevant; the bundle is keyed by role. If any
    /// agent fails, the error names that role and the remaining calls are
    /// dropped.
    pub async fn assess(&self, report: Arc<StructuredReport>) -> Result<AssessmentBundle> {
        let started = Instant::now();
        let agents: Vec<SpecialistAgent> = AgentRole::ALL
            .into_iter()
            .map(|role| self.agent(role, report.clone()))
            .collect();

        info!(agents = agents.len(), "Dispatching specialist agents");
        let assessments = try_join_all(agents.iter().map(|agent| agent.run())).await?;

        let mut bundle = AssessmentBundle::new();
        for assessment in assessments {
            bundle.insert(assessment)?;
        }
        bundle.validate()?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "All specialist assessments collected"
        );
        Ok(bundle)
    }

    /// Consensus summary over a complete bundle
    pub async fn synthesize(&self, bundle: &AssessmentBundle) -> Result<FinalSummary> {
        Synthesizer::new(self.backend.clone()).run(bundle).await
    }

    /// Fan out, join, then synthesize
    pub async fn evaluate(&self, report: StructuredReport) -> Result<CaseOutcome> {
        let report = Arc::new(report);
        let bundle = self.assess(report.clone()).await?;
        let summary = self.synthesize(&bundle).await?;
        Ok(CaseOutcome {
            report,
            bundle,
            summary,
        })
    }
}
