//! End-to-end case processing
//!
//! Extraction, structuring, the concurrent specialist fan-out, synthesis,
//! and rendering. Shared by `/process-complete` and `medteam run`. The
//! run either yields a complete rendered report or an error; intermediate
//! results are never surfaced on failure.

use medteam_agents::{AgentError, AgentRole, CaseOutcome, ReportStructurer, MedicalTeam};
use medteam_extract::{ExtractError, Extractor, PdfExtractor};
use medteam_llm::ChatBackend;
use medteam_report::{MedicalReport, RenderError, ReportRenderer, SpecialistSection};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Failure at any pipeline stage
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Rendering task failed: {0}")]
    Task(String),
}

/// Artifacts of one completed case
#[derive(Debug, Clone)]
pub struct CaseRun {
    pub raw_text_chars: usize,
    pub outcome: CaseOutcome,
    pub pdf: Vec<u8>,
}

/// Build the render input from a finished consultation
pub fn medical_report(outcome: &CaseOutcome) -> MedicalReport {
    let specialists = AgentRole::ALL
        .into_iter()
        .map(|role| {
            SpecialistSection::new(role.title(), outcome.bundle.get(role).unwrap_or_default())
        })
        .collect();

    MedicalReport::new(
        outcome.report.as_str(),
        specialists,
        outcome.summary.as_str(),
    )
}

/// Render on the blocking pool
pub async fn render_pdf(report: MedicalReport) -> Result<Vec<u8>, PipelineError> {
    tokio::task::spawn_blocking(move || ReportRenderer::new().render(&report))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
        .map_err(PipelineError::from)
}

/// The full pipeline over one backend
pub struct Pipeline {
    extractor: PdfExtractor,
    structurer: ReportStructurer,
    team: MedicalTeam,
}

impl Pipeline {
    pub fn new(extractor: PdfExtractor, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            extractor,
            structurer: ReportStructurer::new(backend.clone()),
            team: MedicalTeam::new(backend),
        }
    }

    /// Process the case report at `pdf_path`
    pub async fn run(&self, pdf_path: &Path) -> Result<CaseRun, PipelineError> {
        let started = Instant::now();
        let source = pdf_path.to_string_lossy();

        let extracted = self.extractor.extract(&source).await?;
        info!(chars = extracted.text_length, pages = extracted.page_count, "Extracted case text");

        let structured = self.structurer.structure(&extracted.text).await?;
        info!("Structured report ready");

        let outcome = self.team.evaluate(structured).await?;
        let pdf = render_pdf(medical_report(&outcome)).await?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = pdf.len(),
            "Case processed"
        );
        Ok(CaseRun {
            raw_text_chars: extracted.text_length,
            outcome,
            pdf,
        })
    }
}
