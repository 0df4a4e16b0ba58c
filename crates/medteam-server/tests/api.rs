//! Endpoint behaviour, one stage at a time

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use medteam_agents::AgentRole;
use medteam_llm::LlmError;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Medical Diagnostics API");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .send(Request::get("/nope").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Endpoint not found");
}

// ============================================================================
// /upload-pdf
// ============================================================================

#[tokio::test]
async fn test_upload_stores_timestamped_file() {
    let app = TestApp::new(FakeModel::clinical());
    let pdf = pdf_bytes("Patient reports chest pain");
    let response = app
        .send(multipart_request("file", "case report.pdf", &pdf))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "File uploaded successfully");

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("_case_report.pdf"), "{filename}");
    // YYYYMMDD_HHMMSS_
    assert_eq!(filename.as_bytes()[8], b'_');
    assert_eq!(filename.as_bytes()[15], b'_');

    let stored = std::path::PathBuf::from(body["file_path"].as_str().unwrap());
    assert_eq!(std::fs::read(&stored).unwrap(), pdf);
    assert_eq!(app.uploads(), vec![stored]);
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_without_persisting() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .send(multipart_request("file", "notes.txt", b"plain text"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Invalid file type. Only PDF files are allowed"
    );
    assert!(app.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .send(multipart_request("document", "case.pdf", b"%PDF"))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No file provided");
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app.send(multipart_request("file", "", b"%PDF")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No file selected");
}

#[tokio::test]
async fn test_upload_over_limit_is_413() {
    let app = TestApp::new(FakeModel::clinical());
    let oversized = vec![b'x'; 17 * 1024 * 1024];
    let response = app
        .send(multipart_request("file", "big.pdf", &oversized))
        .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        error_message(response).await,
        "File too large. Maximum size is 16MB"
    );
    assert!(app.uploads().is_empty());
}

// ============================================================================
// /extract-text
// ============================================================================

#[tokio::test]
async fn test_extract_text() {
    let app = TestApp::new(FakeModel::clinical());
    let path = app.case_pdf("Patient reports chest pain");

    let response = app
        .post_json("/extract-text", json!({ "path": path }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Text extracted successfully");
    let raw = body["raw_text"].as_str().unwrap();
    assert!(raw.contains("Patient reports chest pain"), "{raw}");
    assert_eq!(body["text_length"], raw.chars().count());
}

#[tokio::test]
async fn test_extract_requires_path() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app.post_json("/extract-text", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "PDF path is required");
}

#[tokio::test]
async fn test_extract_missing_file_is_404() {
    let app = TestApp::new(FakeModel::clinical());
    let missing = app.dir.path().join("missing.pdf");
    let response = app
        .post_json("/extract-text", json!({ "path": missing }))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "PDF file not found");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = TestApp::new(FakeModel::clinical());
    let request = Request::post("/extract-text")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!error_message(response).await.is_empty());
}

// ============================================================================
// /structure-report
// ============================================================================

#[tokio::test]
async fn test_structure_report() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json("/structure-report", json!({ "text": "pt c/o chest pain" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Report structured successfully");
    assert!(body["structured_report"]
        .as_str()
        .unwrap()
        .starts_with("Chief Complaint"));
    assert_eq!(app.model.calls(), 1);
}

#[tokio::test]
async fn test_structure_report_validation() {
    let app = TestApp::new(FakeModel::clinical());

    let response = app.post_json("/structure-report", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Raw text is required");

    let response = app
        .post_json("/structure-report", json!({ "text": "   " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Text cannot be empty");

    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_backend_failure_names_stage() {
    let app = TestApp::new(FakeModel::new(|_, _| Err(LlmError::MissingApiKey)));
    let response = app
        .post_json("/structure-report", json!({ "text": "chest pain" }))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(response).await;
    assert!(message.starts_with("Report structuring failed"), "{message}");
}

// ============================================================================
// /run-agent/{agent_type}
// ============================================================================

#[tokio::test]
async fn test_run_each_agent() {
    let app = TestApp::new(FakeModel::clinical());
    for role in AgentRole::ALL {
        let response = app
            .post_json(
                &format!("/run-agent/{}", role.name()),
                json!({ "text": "Chief Complaint: chest pain" }),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["agent_type"], role.name());
        assert_eq!(
            body["message"],
            format!("{} assessment completed", role.title())
        );
        assert!(body["assessment"]
            .as_str()
            .unwrap()
            .contains(role.title()));
    }
    assert_eq!(app.model.calls(), 3);
}

#[tokio::test]
async fn test_run_agent_is_case_insensitive() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json("/run-agent/CardioLogist", json!({ "text": "report" }))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["agent_type"], "cardiologist");
}

#[tokio::test]
async fn test_invalid_agent_type_never_calls_backend() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json("/run-agent/dermatologist", json!({ "text": "report" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Invalid agent type. Must be one of: ['cardiologist', 'psychologist', 'pulmonologist']"
    );
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_run_agent_requires_text() {
    let app = TestApp::new(FakeModel::clinical());

    let response = app.post_json("/run-agent/psychologist", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Structured text is required");

    let response = app
        .post_json("/run-agent/psychologist", json!({ "text": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Structured text cannot be empty"
    );
}

#[tokio::test]
async fn test_agent_failure_is_500_naming_role() {
    let app = TestApp::new(FakeModel::new(|_, _| Err(LlmError::Timeout(120))));
    let response = app
        .post_json("/run-agent/pulmonologist", json!({ "text": "report" }))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_message(response).await,
        "Pulmonologist agent failed: Request timed out after 120 seconds"
    );
}

// ============================================================================
// /multidisciplinary-summary
// ============================================================================

#[tokio::test]
async fn test_summary() {
    let app = TestApp::new(FakeModel::new(|call, messages| {
        assert_eq!(call, Call::Team);
        let input = &messages[1].content;
        assert!(input.contains("Cardiologist Report:\nA"));
        assert!(input.contains("Psychologist Report:\nB"));
        assert!(input.contains("Pulmonologist Report:\nC"));
        Ok("Consensus".to_string())
    }));

    let response = app
        .post_json(
            "/multidisciplinary-summary",
            json!({ "cardiologist": "A", "psychologist": "B", "pulmonologist": "C" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Multidisciplinary summary generated successfully"
    );
    assert_eq!(body["summary"], "Consensus");
}

#[tokio::test]
async fn test_summary_lists_missing_fields() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json("/multidisciplinary-summary", json!({ "cardiologist": "A" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Missing required fields: ['psychologist', 'pulmonologist']"
    );
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_summary_rejects_blank_assessment() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json(
            "/multidisciplinary-summary",
            json!({ "cardiologist": "A", "psychologist": " \n", "pulmonologist": "C" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "psychologist assessment cannot be empty"
    );
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_summary_null_assessment_is_empty_not_missing() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app
        .post_json(
            "/multidisciplinary-summary",
            json!({ "cardiologist": null, "psychologist": "B", "pulmonologist": "C" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "cardiologist assessment cannot be empty"
    );
    assert_eq!(app.model.calls(), 0);
}

// ============================================================================
// /generate-pdf
// ============================================================================

fn report_fields() -> serde_json::Value {
    json!({
        "structured_report": "Chief Complaint: chest pain",
        "cardiologist": "No arrhythmia",
        "psychologist": "Panic attacks",
        "pulmonologist": "Normal spirometry",
        "final_summary": "1. Panic disorder",
    })
}

#[tokio::test]
async fn test_generate_pdf_download() {
    let app = TestApp::new(FakeModel::clinical());
    let response = app.post_json("/generate-pdf", report_fields()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"medical_report_"));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));

    let filename = disposition
        .trim_start_matches("attachment; filename=\"")
        .trim_end_matches('"');
    assert_eq!(
        std::fs::read(app.config.report_dir.join(filename)).unwrap(),
        bytes
    );
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_generate_pdf_accepts_single_element_array() {
    let app = TestApp::new(FakeModel::clinical());
    let object = body_bytes(app.post_json("/generate-pdf", report_fields()).await).await;
    let array = body_bytes(
        app.post_json("/generate-pdf", json!([report_fields()]))
            .await,
    )
    .await;

    assert!(!object.is_empty());
    assert_eq!(object, array);
}

#[tokio::test]
async fn test_generate_pdf_rejects_other_shapes() {
    let app = TestApp::new(FakeModel::clinical());
    for body in [json!([report_fields(), report_fields()]), json!("report"), json!([])] {
        let response = app.post_json("/generate-pdf", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(response).await,
            "Invalid data format. Expected JSON object."
        );
    }
}

#[tokio::test]
async fn test_generate_pdf_field_validation() {
    let app = TestApp::new(FakeModel::clinical());

    let mut body = report_fields();
    body.as_object_mut().unwrap().remove("final_summary");
    body.as_object_mut().unwrap().remove("cardiologist");
    let response = app.post_json("/generate-pdf", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Missing required fields: ['cardiologist', 'final_summary']"
    );

    let mut body = report_fields();
    body["pulmonologist"] = json!("");
    let response = app.post_json("/generate-pdf", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "pulmonologist cannot be empty");

    let mut body = report_fields();
    body["final_summary"] = serde_json::Value::Null;
    let response = app.post_json("/generate-pdf", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "final_summary cannot be empty");
}
