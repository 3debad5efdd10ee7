use std::sync::Arc;

use console_client::{ApiError, Backend, ClientSettings, HttpBackend, TokenStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server_uri: &str, token: Option<&str>) -> (HttpBackend, Arc<TokenStore>) {
    let tokens = Arc::new(TokenStore::ephemeral());
    if let Some(token) = token {
        tokens.set(token);
    }
    let backend = HttpBackend::new(ClientSettings::new(server_uri), tokens.clone())
        .expect("build http backend");
    (backend, tokens)
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_text_sends_bearer_and_parses_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agents/kb1/upload-text"))
        .and(header("authorization", "Bearer tkn"))
        .and(body_json(json!({ "content": "hello", "title": "Note" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, _tokens) = backend_for(&server.uri(), Some("tkn"));
    let accept = backend
        .upload_text("kb1", "hello", "Note")
        .await
        .expect("upload accepted");

    assert_eq!(accept.job_id.as_deref(), Some("j1"));
    assert_eq!(accept.message, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn job_status_parses_the_full_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents/kb1/upload/status/j1"))
        .and(header("authorization", "Bearer tkn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "progress": 2,
            "total_files": 5,
            "processed_files": ["a.pdf", "b.pdf"],
            "skipped_files": ["c.pdf"],
            "failed_files": [],
            "message": "Chunking b.pdf",
        })))
        .mount(&server)
        .await;

    let (backend, _tokens) = backend_for(&server.uri(), Some("tkn"));
    let report = backend.job_status("kb1", "j1").await.expect("status ok");

    assert_eq!(report.status, "processing");
    assert_eq!(report.progress, 2);
    assert_eq!(report.total_files, 5);
    assert_eq!(report.processed_files.len(), 2);
    assert_eq!(report.skipped_files.len(), 1);
    assert!(report.failed_files.is_empty());
    assert_eq!(report.message.as_deref(), Some("Chunking b.pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_error_detail_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agents/kb1/upload-links"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "No valid URLs" })),
        )
        .mount(&server)
        .await;

    let (backend, _tokens) = backend_for(&server.uri(), Some("tkn"));
    let err = backend
        .upload_links("kb1", &["https://example.com".to_string()])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::BackendRejected {
            status: 400,
            message: "No valid URLs".to_string(),
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_response_clears_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .mount(&server)
        .await;

    let (backend, tokens) = backend_for(&server.uri(), Some("tkn"));
    let err = backend.list_agents().await.unwrap_err();

    assert_eq!(err, ApiError::AuthRequired);
    assert_eq!(tokens.get(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_token_short_circuits_before_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (backend, _tokens) = backend_for(&server.uri(), None);
    let err = backend.list_agents().await.unwrap_err();

    assert_eq!(err, ApiError::AuthRequired);
    // The mock's expect(0) verifies no request was made.
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_backend_maps_to_transport_error() {
    let (backend, _tokens) = backend_for("http://127.0.0.1:9", Some("tkn"));
    let err = backend.list_agents().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_stores_the_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@b.c", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "access_token": "fresh-token",
                "user": {
                    "id": "u1",
                    "email": "a@b.c",
                    "full_name": "Ada",
                    "is_verified": true,
                },
            },
        })))
        .mount(&server)
        .await;

    let (backend, tokens) = backend_for(&server.uri(), None);
    let envelope = backend.login("a@b.c", "pw").await.expect("login ok");

    assert!(envelope.success);
    assert_eq!(tokens.get().as_deref(), Some("fresh-token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn upload_files_posts_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/agents/forklift/upload"))
        .and(header("authorization", "Bearer tkn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "j7" })))
        .expect(1)
        .mount(&server)
        .await;

    let (backend, _tokens) = backend_for(&server.uri(), Some("tkn"));
    let accept = backend
        .upload_files(
            "forklift",
            vec![console_core::FileAttachment {
                name: "manual.pdf".to_string(),
                bytes: b"%PDF-1.4".to_vec(),
            }],
        )
        .await
        .expect("upload accepted");

    assert_eq!(accept.job_id.as_deref(), Some("j7"));
}
