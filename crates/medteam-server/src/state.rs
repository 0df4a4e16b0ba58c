//! Shared application state

use medteam_agents::{MedicalTeam, ReportStructurer, Synthesizer};
use medteam_config::AppConfig;
use medteam_extract::{ExtractorConfig, PdfExtractor};
use medteam_llm::ChatBackend;
use std::sync::Arc;

use crate::pipeline::Pipeline;

/// Read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ChatBackend>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    pub fn extractor(&self) -> PdfExtractor {
        PdfExtractor::new(
            ExtractorConfig::default().with_max_length(self.config.max_extracted_chars),
        )
    }

    pub fn structurer(&self) -> ReportStructurer {
        ReportStructurer::new(self.backend.clone())
    }

    pub fn team(&self) -> MedicalTeam {
        MedicalTeam::new(self.backend.clone())
    }

    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer::new(self.backend.clone())
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.extractor(), self.backend.clone())
    }
}
