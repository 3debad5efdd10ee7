use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use console_logging::{console_error, console_info};
use serde_json::json;

/// Returned whenever the backend cannot be reached at all, with a 502 so
/// callers can tell "backend rejected this" from "backend unreachable".
const TRANSPORT_ERROR: &str = "Failed to connect to backend service";

#[derive(Clone)]
pub struct RelayState {
    pub(crate) client: reqwest::Client,
    pub(crate) backend_url: Arc<String>,
}

impl RelayState {
    pub fn new(backend_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            backend_url: Arc::new(backend_url.trim_end_matches('/').to_string()),
        })
    }
}

/// Whether a route needs an `Authorization` header before the backend is
/// contacted.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthPolicy {
    Required,
    Open,
}

/// Forwards one inbound request to the backend at the same path,
/// preserving method, body, and bearer header. Backend success bodies
/// pass through unchanged; every failure is mapped to `{"error": ...}`.
pub(crate) async fn forward(
    state: &RelayState,
    method: reqwest::Method,
    path: &str,
    headers: &HeaderMap,
    body: Option<Bytes>,
    policy: AuthPolicy,
    fallback: &str,
) -> Response {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if policy == AuthPolicy::Required && auth_header.is_none() {
        return error_response(StatusCode::UNAUTHORIZED, "Authorization header required");
    }

    let method_label = method.to_string();
    let url = format!("{}{}", state.backend_url, path);
    let mut request = state.client.request(method, &url);
    if let Some(auth) = auth_header {
        request = request.header("authorization", auth);
    }
    if let Some(body) = body {
        // Content type is preserved so multipart uploads survive the hop.
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        request = request.header("content-type", content_type).body(body);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            console_error!("{} {} unreachable: {}", method_label, path, err);
            return error_response(StatusCode::BAD_GATEWAY, TRANSPORT_ERROR);
        }
    };

    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            console_error!("{} {} body read failed: {}", method_label, path, err);
            return error_response(StatusCode::BAD_GATEWAY, TRANSPORT_ERROR);
        }
    };

    console_info!("{} {} -> {}", method_label, path, status);

    if status.is_success() {
        return (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response();
    }

    // FastAPI reports errors as `{"detail": ...}`; surface that text when
    // present, otherwise the route-specific fallback.
    let detail = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        });
    error_response(status, &detail.unwrap_or_else(|| fallback.to_string()))
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
