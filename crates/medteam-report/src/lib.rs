//! # Medteam Report
//!
//! Lays out a case report and its specialist assessments as an A4 PDF.
//!
//! Text is set in the standard Helvetica faces with WinAnsi encoding, so no
//! font files are embedded. Light Markdown from model output (headings,
//! bold markers, bullets) is flattened into plain blocks before layout.
//! Rendering is deterministic: identical input yields identical bytes.
//!
//! ```rust,ignore
//! use medteam_report::{MedicalReport, ReportRenderer, SpecialistSection};
//!
//! let report = MedicalReport::new(
//!     structured,
//!     vec![SpecialistSection::new("Cardiologist", cardio)],
//!     summary,
//! );
//! let bytes = ReportRenderer::new().render(&report)?;
//! ```

pub mod document;
pub mod error;
pub mod report;
pub mod text;

pub use document::{Block, ReportDocument};
pub use error::{RenderError, Result};
pub use report::{MedicalReport, ReportRenderer, SpecialistSection};
