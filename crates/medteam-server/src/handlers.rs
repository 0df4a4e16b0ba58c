//! Request handlers

use crate::error::ApiError;
use crate::pipeline::render_pdf;
use crate::state::AppState;
use crate::upload::{file_timestamp, is_pdf, stored_name};
use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use medteam_agents::{AgentRole, AssessmentBundle, StructuredReport};
use medteam_extract::{preview, Extractor};
use medteam_report::{MedicalReport, SpecialistSection};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

type ApiResult<T> = Result<T, ApiError>;

const SERVICE_NAME: &str = "Medical Diagnostics API";
const PREVIEW_CHARS: usize = 100;

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub file_path: String,
    pub filename: String,
    pub upload_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub message: &'static str,
    pub raw_text: String,
    pub text_length: usize,
    pub extraction_time: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StructureResponse {
    pub message: &'static str,
    pub structured_report: String,
    pub processing_time: String,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub message: String,
    pub agent_type: &'static str,
    pub assessment: String,
    pub processing_time: String,
}

/// A required body field: `None` when the key is absent, `Some(None)` when
/// it is present but `null`
pub type Field = Option<Option<String>>;

fn present<'de, D>(deserializer: D) -> Result<Field, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default, deserialize_with = "present")]
    pub cardiologist: Field,
    #[serde(default, deserialize_with = "present")]
    pub psychologist: Field,
    #[serde(default, deserialize_with = "present")]
    pub pulmonologist: Field,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub message: &'static str,
    pub summary: String,
    pub processing_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default, deserialize_with = "present")]
    pub structured_report: Field,
    #[serde(default, deserialize_with = "present")]
    pub cardiologist: Field,
    #[serde(default, deserialize_with = "present")]
    pub psychologist: Field,
    #[serde(default, deserialize_with = "present")]
    pub pulmonologist: Field,
    #[serde(default, deserialize_with = "present")]
    pub final_summary: Field,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub pdf_path: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

fn now_iso() -> String {
    Local::now().to_rfc3339()
}

fn json_body<T>(state: &AppState, payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::from_json_rejection(rejection, state.config.max_upload_bytes))
}

/// Present and non-blank, or the given messages
fn required_text(value: Option<String>, missing: &str, empty: &str) -> ApiResult<String> {
    match value {
        None => Err(ApiError::validation(missing)),
        Some(text) if text.trim().is_empty() => Err(ApiError::validation(empty)),
        Some(text) => Ok(text),
    }
}

/// Check a set of named fields: every absent one is listed, then the first
/// blank or `null` one is reported with `empty_suffix`
fn required_fields<'a>(
    fields: &'a [(&'static str, Field)],
    empty_suffix: &str,
) -> ApiResult<Vec<&'a str>> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| format!("'{name}'"))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::validation(format!(
            "Missing required fields: [{}]",
            missing.join(", ")
        )));
    }

    let mut values = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let text = value.as_ref().and_then(|v| v.as_deref()).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ApiError::validation(format!("{name} {empty_suffix}")));
        }
        values.push(text);
    }
    Ok(values)
}

fn pdf_attachment(filename: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Persist a rendered report into the report directory and return it
async fn deliver_report(state: &AppState, prefix: &str, bytes: Vec<u8>) -> ApiResult<Response> {
    let filename = format!("{prefix}_{}.pdf", file_timestamp(Local::now()));
    let path = state.config.report_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::Rendering(format!("PDF generation failed: {e}")))?;
    info!(path = %path.display(), bytes = bytes.len(), "Report ready for download");
    Ok(pdf_attachment(&filename, bytes))
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_iso(),
        service: SERVICE_NAME,
    })
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, axum::extract::multipart::MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let limit = state.config.max_upload_bytes;
    let mut multipart =
        multipart.map_err(|_| ApiError::validation("No file provided"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_string();
        if original.is_empty() {
            return Err(ApiError::validation("No file selected"));
        }
        if !is_pdf(&original) {
            return Err(ApiError::validation(
                "Invalid file type. Only PDF files are allowed",
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, limit))?;

        let filename = stored_name(&original, Local::now());
        let path = state.config.upload_dir.join(&filename);
        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Upload failed: {e}")))?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Upload failed: {e}")))?;

        info!(path = %path.display(), bytes = bytes.len(), "Stored upload");
        return Ok(Json(UploadResponse {
            message: "File uploaded successfully",
            file_path: path.to_string_lossy().to_string(),
            filename,
            upload_time: now_iso(),
        }));
    }

    Err(ApiError::validation("No file provided"))
}

pub async fn extract_text(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> ApiResult<Json<ExtractResponse>> {
    let request = json_body(&state, payload)?;
    let path = request
        .path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::validation("PDF path is required"))?;

    let result = state.extractor().extract(&path).await?;
    debug!(chars = result.text_length, preview = %preview(&result.text, PREVIEW_CHARS), "Extracted text");

    Ok(Json(ExtractResponse {
        message: "Text extracted successfully",
        text_length: result.text_length,
        raw_text: result.text,
        extraction_time: now_iso(),
    }))
}

pub async fn structure_report(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<StructureResponse>> {
    let request = json_body(&state, payload)?;
    let text = required_text(request.text, "Raw text is required", "Text cannot be empty")?;

    let report = state.structurer().structure(&text).await?;
    debug!(preview = %preview(report.as_str(), PREVIEW_CHARS), "Structured report");

    Ok(Json(StructureResponse {
        message: "Report structured successfully",
        structured_report: report.into_inner(),
        processing_time: now_iso(),
    }))
}

pub async fn run_agent(
    State(state): State<AppState>,
    Path(agent_type): Path<String>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<AgentResponse>> {
    let role = AgentRole::from_str(&agent_type).ok_or_else(|| {
        let names: Vec<String> = AgentRole::names().iter().map(|n| format!("'{n}'")).collect();
        ApiError::validation(format!(
            "Invalid agent type. Must be one of: [{}]",
            names.join(", ")
        ))
    })?;

    let request = json_body(&state, payload)?;
    let text = required_text(
        request.text,
        "Structured text is required",
        "Structured text cannot be empty",
    )?;

    let report = Arc::new(StructuredReport::new(text)?);
    let assessment = state.team().run_agent(role, report).await?;
    debug!(role = %role, preview = %preview(&assessment.text, PREVIEW_CHARS), "Assessment");

    Ok(Json(AgentResponse {
        message: format!("{} assessment completed", role.title()),
        agent_type: role.name(),
        assessment: assessment.text,
        processing_time: now_iso(),
    }))
}

pub async fn multidisciplinary_summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let request = json_body(&state, payload)?;
    let fields = [
        ("cardiologist", request.cardiologist),
        ("psychologist", request.psychologist),
        ("pulmonologist", request.pulmonologist),
    ];
    let values = required_fields(&fields, "assessment cannot be empty")?;

    let bundle = AssessmentBundle::from_texts(values[0], values[1], values[2]);
    let summary = state.synthesizer().run(&bundle).await?;

    Ok(Json(SummaryResponse {
        message: "Multidisciplinary summary generated successfully",
        summary: summary.into_inner(),
        processing_time: now_iso(),
    }))
}

pub async fn generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let body = json_body(&state, payload)?;

    // Automation tools often wrap a single item in an array
    let body = match body {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    let invalid = || ApiError::validation("Invalid data format. Expected JSON object.");
    if !body.is_object() {
        return Err(invalid());
    }
    let request: ReportRequest = serde_json::from_value(body).map_err(|_| invalid())?;

    let fields = [
        ("structured_report", request.structured_report),
        ("cardiologist", request.cardiologist),
        ("psychologist", request.psychologist),
        ("pulmonologist", request.pulmonologist),
        ("final_summary", request.final_summary),
    ];
    let values = required_fields(&fields, "cannot be empty")?;
    debug!(preview = %preview(values[0], PREVIEW_CHARS), "Rendering report");

    let specialists = AgentRole::ALL
        .into_iter()
        .zip(&values[1..4])
        .map(|(role, text)| SpecialistSection::new(role.title(), *text))
        .collect();
    let report = MedicalReport::new(values[0], specialists, values[4]);

    let bytes = render_pdf(report).await?;
    deliver_report(&state, "medical_report", bytes).await
}

pub async fn process_complete(
    State(state): State<AppState>,
    payload: Result<Json<CompleteRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let request = json_body(&state, payload)?;
    let pdf_path = request
        .pdf_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::validation("PDF path is required"))?;

    let path = std::path::PathBuf::from(&pdf_path);
    if !path.exists() {
        return Err(ApiError::NotFound("PDF file not found".to_string()));
    }

    let run = state.pipeline().run(&path).await?;
    debug!(summary = %preview(run.outcome.summary.as_str(), PREVIEW_CHARS), "Pipeline finished");
    deliver_report(&state, "complete_medical_report", run.pdf).await
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

