//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use medteam_agents::prompts::{specialist_prompt, STRUCTURER_PROMPT, TEAM_PROMPT};
use medteam_agents::AgentRole;
use medteam_config::AppConfig;
use medteam_llm::{ChatBackend, ChatMessage, Completion, LlmError};
use medteam_report::ReportDocument;
use medteam_server::{router, AppState};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "medteam-test-boundary";

/// Which pipeline stage a request belongs to, by its system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Structure,
    Specialist(AgentRole),
    Team,
    Unknown,
}

pub fn classify(messages: &[ChatMessage]) -> Call {
    let Some(system) = messages.first() else {
        return Call::Unknown;
    };
    if system.content == STRUCTURER_PROMPT {
        return Call::Structure;
    }
    if system.content == TEAM_PROMPT {
        return Call::Team;
    }
    AgentRole::ALL
        .into_iter()
        .find(|role| system.content == specialist_prompt(*role))
        .map_or(Call::Unknown, Call::Specialist)
}

type Reply = Box<dyn Fn(Call, &[ChatMessage]) -> medteam_llm::Result<String> + Send + Sync>;

/// Deterministic stand-in for the hosted model
pub struct FakeModel {
    reply: Reply,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(Call, &[ChatMessage]) -> medteam_llm::Result<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
        }
    }

    /// Plausible canned answers for every stage
    pub fn clinical() -> Self {
        Self::new(|call, _| {
            Ok(match call {
                Call::Structure => "Chief Complaint: chest pain\nHistory: episodic".to_string(),
                Call::Specialist(role) => format!("**{} view**\n- no acute findings", role.title()),
                Call::Team => "1. Panic disorder: episodic chest pain without cardiac cause".to_string(),
                Call::Unknown => "ok".to_string(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for FakeModel {
    fn model(&self) -> &str {
        "fake"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> medteam_llm::Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = (self.reply)(classify(messages), messages)?;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(Completion::new(text))
    }
}

/// A router over temp directories and a fake model
pub struct TestApp {
    pub dir: TempDir,
    pub model: Arc<FakeModel>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new(model: FakeModel) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            upload_dir: dir.path().join("uploads"),
            report_dir: dir.path().join("reports"),
            ..AppConfig::default()
        };
        config.ensure_directories().unwrap();
        Self {
            dir,
            model: Arc::new(model),
            config,
        }
    }

    pub fn router(&self) -> Router {
        router(AppState::new(self.config.clone(), self.model.clone()))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(json_request(uri, &body)).await
    }

    pub fn uploads(&self) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(&self.config.upload_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    /// Write a one-page case PDF and return its path
    pub fn case_pdf(&self, text: &str) -> std::path::PathBuf {
        let path = self.dir.path().join("case.pdf");
        std::fs::write(&path, pdf_bytes(text)).unwrap();
        path
    }
}

pub fn pdf_bytes(text: &str) -> Vec<u8> {
    ReportDocument::new("Case Report")
        .paragraph(text)
        .to_pdf_bytes()
        .unwrap()
}

pub fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// multipart/form-data body with one file field
pub fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-pdf")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn error_message(response: Response<Body>) -> String {
    body_json(response).await["error"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
