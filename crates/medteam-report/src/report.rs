//! The consolidated multidisciplinary report

use crate::document::ReportDocument;
use crate::error::{RenderError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const REPORT_TITLE: &str = "Medical Diagnostic Report";
pub const STRUCTURED_HEADING: &str = "Structured Medical Report";
pub const SUMMARY_HEADING: &str = "Final Multidisciplinary Diagnosis";
const DISCLAIMER: &str = "This report was generated by AI agents for research and educational \
    purposes only. It is not a substitute for professional medical advice, diagnosis, or treatment.";

/// One specialist's section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistSection {
    /// Display title, e.g. "Cardiologist"
    pub title: String,
    pub text: String,
}

impl SpecialistSection {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Inputs for the final PDF, in render order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalReport {
    pub structured_report: String,
    pub specialists: Vec<SpecialistSection>,
    pub final_summary: String,
}

impl MedicalReport {
    pub fn new(
        structured_report: impl Into<String>,
        specialists: Vec<SpecialistSection>,
        final_summary: impl Into<String>,
    ) -> Self {
        Self {
            structured_report: structured_report.into(),
            specialists,
            final_summary: final_summary.into(),
        }
    }

    /// Every section must carry text
    pub fn validate(&self) -> Result<()> {
        if self.structured_report.trim().is_empty() {
            return Err(RenderError::MissingField("structured_report".to_string()));
        }
        if self.specialists.is_empty() {
            return Err(RenderError::MissingField("specialist assessments".to_string()));
        }
        for section in &self.specialists {
            if section.text.trim().is_empty() {
                return Err(RenderError::MissingField(format!(
                    "{} assessment",
                    section.title.to_lowercase()
                )));
            }
        }
        if self.final_summary.trim().is_empty() {
            return Err(RenderError::MissingField("final_summary".to_string()));
        }
        Ok(())
    }

    /// Document layout: structured report, each specialist, then the consensus
    pub fn to_document(&self) -> ReportDocument {
        let mut doc = ReportDocument::new(REPORT_TITLE)
            .heading(STRUCTURED_HEADING)
            .markdown(&self.structured_report);

        for section in &self.specialists {
            doc = doc
                .heading(format!("{} Assessment", section.title))
                .markdown(&section.text);
        }

        doc.heading(SUMMARY_HEADING)
            .markdown(&self.final_summary)
            .spacer()
            .paragraph(DISCLAIMER)
    }
}

/// Renders [`MedicalReport`]s to PDF
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Validate and render to bytes
    pub fn render(&self, report: &MedicalReport) -> Result<Vec<u8>> {
        report.validate()?;
        report.to_document().to_pdf_bytes()
    }

    /// Validate, render, and write to `path`
    pub fn render_to_file(&self, report: &MedicalReport, path: &Path) -> Result<()> {
        let bytes = self.render(report)?;
        std::fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Report written");
        Ok(())
    }
}
