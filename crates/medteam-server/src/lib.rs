//! Medteam Server - HTTP surface for the diagnostics pipeline
//!
//! Every pipeline stage is exposed as its own endpoint so an external
//! automation tool can drive a case piecewise, plus `/process-complete`
//! for a single end-to-end call:
//!
//! | Endpoint | Stage |
//! |---|---|
//! | `GET /health` | liveness |
//! | `POST /upload-pdf` | store a case report |
//! | `POST /extract-text` | PDF to plain text |
//! | `POST /structure-report` | raw text to structured report |
//! | `POST /run-agent/{agent_type}` | one specialist |
//! | `POST /multidisciplinary-summary` | consensus over three assessments |
//! | `POST /generate-pdf` | render the final report |
//! | `POST /process-complete` | all of the above |
//!
//! Every failure is a JSON `{"error": "..."}` body.

pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use pipeline::{CaseRun, Pipeline, PipelineError};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/upload-pdf", post(handlers::upload_pdf))
        .route("/extract-text", post(handlers::extract_text))
        .route("/structure-report", post(handlers::structure_report))
        .route("/run-agent/:agent_type", post(handlers::run_agent))
        .route(
            "/multidisciplinary-summary",
            post(handlers::multidisciplinary_summary),
        )
        .route("/generate-pdf", post(handlers::generate_pdf))
        .route("/process-complete", post(handlers::process_complete))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");
    ApiError::Internal("Internal server error".to_string()).into_response()
}
