//! HTTP error mapping

use crate::pipeline::PipelineError;
use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medteam_agents::AgentError;
use medteam_extract::ExtractError;
use medteam_report::RenderError;
use serde::Serialize;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request failure, resolved to a status code and `{"error": ...}` body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// A language-model call failed; the message names the stage
    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    Rendering(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn too_large(limit_bytes: usize) -> Self {
        ApiError::PayloadTooLarge(format!(
            "File too large. Maximum size is {}MB",
            limit_bytes / (1024 * 1024)
        ))
    }

    /// Reshape a JSON body rejection
    pub fn from_json_rejection(rejection: JsonRejection, limit_bytes: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::too_large(limit_bytes)
        } else {
            ApiError::Validation(rejection.body_text())
        }
    }

    /// Reshape a multipart stream error
    pub fn from_multipart(err: MultipartError, limit_bytes: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::too_large(limit_bytes)
        } else {
            ApiError::Validation(err.body_text())
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Backend(_) | ApiError::Rendering(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidInput { .. } => ApiError::Validation(err.to_string()),
            AgentError::Call { .. } => ApiError::Backend(err.to_string()),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::NotFound(_) => ApiError::NotFound("PDF file not found".to_string()),
            ExtractError::Empty | ExtractError::ContentTooLarge { .. } => {
                ApiError::Validation(err.to_string())
            }
            ExtractError::Pdf(_) | ExtractError::Io(_) | ExtractError::Task(_) => {
                ApiError::Internal(format!("Text extraction failed: {err}"))
            }
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MissingField(_) => ApiError::Validation(err.to_string()),
            RenderError::Pdf(_) | RenderError::Io(_) => {
                ApiError::Rendering(format!("PDF generation failed: {err}"))
            }
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Extract(e) => e.into(),
            PipelineError::Agent(e) => e.into(),
            PipelineError::Render(e) => e.into(),
            PipelineError::Task(msg) => ApiError::Internal(msg),
        }
    }
}
