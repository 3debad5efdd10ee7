use serde::Deserialize;
use thiserror::Error;

/// Error taxonomy for backend calls. Backend-provided messages are
/// surfaced where present; transport failures carry no backend detail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("authentication required")]
    AuthRequired,
    #[error("backend rejected request ({status}): {message}")]
    BackendRejected { status: u16, message: String },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    ApiError::Transport(err.to_string())
}

/// Agent list entry as returned by `GET /api/agents`. File and chunk
/// counts default to zero for backends that only report them via stats.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AgentRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub extra_instructions: String,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `GET /api/agents/{name}/stats`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AgentStats {
    pub agent_name: String,
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub extra_instructions: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Accept response for the three upload endpoints. `job_id` is absent
/// when the backend finished synchronously.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct UploadAccept {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/agents/{name}/upload/status/{job_id}`, taken verbatim.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct StatusReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: u64,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub processed_files: Vec<String>,
    #[serde(default)]
    pub skipped_files: Vec<String>,
    #[serde(default)]
    pub failed_files: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct Conversation {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthData {
    pub access_token: String,
    pub user: UserProfile,
}

/// Envelope shape used by the auth endpoints.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<AuthData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<MeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeData {
    pub user: UserProfile,
}

/// Error payload shapes seen from the relay (`error`) and from the
/// backend directly (`detail`).
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message(self) -> Option<String> {
        self.error.or(self.detail).filter(|m| !m.trim().is_empty())
    }
}
