use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::Router;
use reqwest::Method;

use crate::forward::{forward, AuthPolicy, RelayState};

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/agents", get(list_agents).post(create_agent))
        .route("/api/agents/{name}", delete(delete_agent))
        .route("/api/agents/{name}/stats", get(agent_stats))
        .route("/api/agents/{name}/chat", post(chat))
        .route("/api/agents/{name}/upload", post(upload_files))
        .route("/api/agents/{name}/upload-text", post(upload_text))
        .route("/api/agents/{name}/upload-links", post(upload_links))
        .route("/api/agents/{name}/upload/status/{job_id}", get(upload_status))
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/api/auth/register", post(auth_register))
        .route("/api/auth/login", post(auth_login))
        .route("/api/auth/verify-email", post(auth_verify_email))
        .route("/api/auth/reset-password", post(auth_reset_password))
        .route("/api/auth/me", get(auth_me))
        .with_state(state)
}

async fn list_agents(State(state): State<RelayState>, headers: HeaderMap) -> Response {
    forward(
        &state,
        Method::GET,
        "/api/agents",
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to fetch agents",
    )
    .await
}

async fn create_agent(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        "/api/agents",
        &headers,
        Some(body),
        AuthPolicy::Required,
        "Failed to create agent",
    )
    .await
}

async fn delete_agent(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::DELETE,
        &format!("/api/agents/{name}"),
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to delete agent",
    )
    .await
}

async fn agent_stats(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::GET,
        &format!("/api/agents/{name}/stats"),
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to fetch agent stats",
    )
    .await
}

async fn chat(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        &format!("/api/agents/{name}/chat"),
        &headers,
        Some(body),
        AuthPolicy::Required,
        "Chat request failed",
    )
    .await
}

async fn upload_files(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        &format!("/api/agents/{name}/upload"),
        &headers,
        Some(body),
        AuthPolicy::Required,
        "Failed to upload files",
    )
    .await
}

async fn upload_text(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        &format!("/api/agents/{name}/upload-text"),
        &headers,
        Some(body),
        AuthPolicy::Required,
        "Failed to process text",
    )
    .await
}

async fn upload_links(
    State(state): State<RelayState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        &format!("/api/agents/{name}/upload-links"),
        &headers,
        Some(body),
        AuthPolicy::Required,
        "Failed to process links",
    )
    .await
}

async fn upload_status(
    State(state): State<RelayState>,
    Path((name, job_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::GET,
        &format!("/api/agents/{name}/upload/status/{job_id}"),
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to fetch job status",
    )
    .await
}

async fn get_conversation(
    State(state): State<RelayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::GET,
        &format!("/api/conversations/{id}"),
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to fetch conversation",
    )
    .await
}

async fn delete_conversation(
    State(state): State<RelayState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    forward(
        &state,
        Method::DELETE,
        &format!("/api/conversations/{id}"),
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to delete conversation",
    )
    .await
}

async fn auth_register(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        "/api/auth/register",
        &headers,
        Some(body),
        AuthPolicy::Open,
        "Registration failed",
    )
    .await
}

async fn auth_login(State(state): State<RelayState>, headers: HeaderMap, body: Bytes) -> Response {
    forward(
        &state,
        Method::POST,
        "/api/auth/login",
        &headers,
        Some(body),
        AuthPolicy::Open,
        "Login failed",
    )
    .await
}

async fn auth_verify_email(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        "/api/auth/verify-email",
        &headers,
        Some(body),
        AuthPolicy::Open,
        "Email verification failed",
    )
    .await
}

async fn auth_reset_password(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    forward(
        &state,
        Method::POST,
        "/api/auth/reset-password",
        &headers,
        Some(body),
        AuthPolicy::Open,
        "Password reset failed",
    )
    .await
}

async fn auth_me(State(state): State<RelayState>, headers: HeaderMap) -> Response {
    forward(
        &state,
        Method::GET,
        "/api/auth/me",
        &headers,
        None,
        AuthPolicy::Required,
        "Failed to fetch user",
    )
    .await
}
