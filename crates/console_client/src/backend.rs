use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use console_logging::console_debug;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use console_core::FileAttachment;

use crate::token::TokenStore;
use crate::types::{
    map_reqwest_error, AgentRecord, AgentStats, ApiError, AuthEnvelope, ChatReply, Conversation,
    ErrorBody, MeEnvelope, StatusReport, UploadAccept, UserProfile,
};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The slice of the backend API the upload runtime needs. Kept narrow so
/// tests can substitute a scripted implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_agents(&self) -> Result<Vec<AgentRecord>, ApiError>;
    async fn upload_files(
        &self,
        agent: &str,
        files: Vec<FileAttachment>,
    ) -> Result<UploadAccept, ApiError>;
    async fn upload_text(
        &self,
        agent: &str,
        content: &str,
        title: &str,
    ) -> Result<UploadAccept, ApiError>;
    async fn upload_links(&self, agent: &str, urls: &[String]) -> Result<UploadAccept, ApiError>;
    async fn job_status(&self, agent: &str, job_id: &str) -> Result<StatusReport, ApiError>;
}

/// Reqwest-backed API client. The token is read from the store at call
/// time, never cached at construction.
pub struct HttpBackend {
    client: reqwest::Client,
    settings: ClientSettings,
    tokens: Arc<TokenStore>,
}

impl HttpBackend {
    pub fn new(settings: ClientSettings, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            client,
            settings,
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url, path)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.tokens
            .get()
            .map(|token| format!("Bearer {token}"))
            .ok_or(ApiError::AuthRequired)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Token invalid or expired: drop it so subsequent calls see
            // the cleared slot immediately.
            self.tokens.clear();
            return Err(ApiError::AuthRequired);
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(ErrorBody::message)
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::BackendRejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| ApiError::Malformed(err.to_string()))
    }

    pub async fn agent_stats(&self, agent: &str) -> Result<AgentStats, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .get(self.url(&format!("/api/agents/{agent}/stats")))
                .header(AUTHORIZATION, auth),
        )
        .await
    }

    pub async fn create_agent(
        &self,
        name: &str,
        description: &str,
        extra_instructions: &str,
    ) -> Result<AgentRecord, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .post(self.url("/api/agents"))
                .header(AUTHORIZATION, auth)
                .json(&json!({
                    "name": name,
                    "description": description,
                    "extra_instructions": extra_instructions,
                })),
        )
        .await
    }

    pub async fn delete_agent(&self, name: &str) -> Result<(), ApiError> {
        let auth = self.bearer()?;
        let _: serde_json::Value = self
            .execute(
                self.client
                    .delete(self.url(&format!("/api/agents/{name}")))
                    .header(AUTHORIZATION, auth),
            )
            .await?;
        Ok(())
    }

    pub async fn chat(
        &self,
        agent: &str,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let auth = self.bearer()?;
        let mut body = json!({ "message": message });
        if let Some(id) = conversation_id {
            body["conversation_id"] = json!(id);
        }
        self.execute(
            self.client
                .post(self.url(&format!("/api/agents/{agent}/chat")))
                .header(AUTHORIZATION, auth)
                .json(&body),
        )
        .await
    }

    pub async fn conversation(&self, id: &str) -> Result<Conversation, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .get(self.url(&format!("/api/conversations/{id}")))
                .header(AUTHORIZATION, auth),
        )
        .await
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<(), ApiError> {
        let auth = self.bearer()?;
        let _: serde_json::Value = self
            .execute(
                self.client
                    .delete(self.url(&format!("/api/conversations/{id}")))
                    .header(AUTHORIZATION, auth),
            )
            .await?;
        Ok(())
    }

    /// Logs in and stores the returned token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthEnvelope, ApiError> {
        let envelope: AuthEnvelope = self
            .execute(
                self.client
                    .post(self.url("/api/auth/login"))
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;
        if envelope.success {
            if let Some(data) = &envelope.data {
                self.tokens.set(&data.access_token);
            }
        }
        Ok(envelope)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthEnvelope, ApiError> {
        self.execute(self.client.post(self.url("/api/auth/register")).json(&json!({
            "email": email,
            "password": password,
            "full_name": full_name,
        })))
        .await
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let auth = self.bearer()?;
        let envelope: MeEnvelope = self
            .execute(
                self.client
                    .get(self.url("/api/auth/me"))
                    .header(AUTHORIZATION, auth),
            )
            .await?;
        match envelope.data {
            Some(data) if envelope.success => Ok(data.user),
            _ => {
                self.tokens.clear();
                Err(ApiError::AuthRequired)
            }
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_agents(&self) -> Result<Vec<AgentRecord>, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .get(self.url("/api/agents"))
                .header(AUTHORIZATION, auth),
        )
        .await
    }

    async fn upload_files(
        &self,
        agent: &str,
        files: Vec<FileAttachment>,
    ) -> Result<UploadAccept, ApiError> {
        let auth = self.bearer()?;
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            console_debug!("attaching file {} ({} bytes)", file.name, file.bytes.len());
            form = form.part(
                "files",
                reqwest::multipart::Part::bytes(file.bytes).file_name(file.name),
            );
        }
        self.execute(
            self.client
                .post(self.url(&format!("/api/agents/{agent}/upload")))
                .header(AUTHORIZATION, auth)
                .multipart(form),
        )
        .await
    }

    async fn upload_text(
        &self,
        agent: &str,
        content: &str,
        title: &str,
    ) -> Result<UploadAccept, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .post(self.url(&format!("/api/agents/{agent}/upload-text")))
                .header(AUTHORIZATION, auth)
                .json(&json!({ "content": content, "title": title })),
        )
        .await
    }

    async fn upload_links(&self, agent: &str, urls: &[String]) -> Result<UploadAccept, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .post(self.url(&format!("/api/agents/{agent}/upload-links")))
                .header(AUTHORIZATION, auth)
                .json(&json!({ "urls": urls })),
        )
        .await
    }

    async fn job_status(&self, agent: &str, job_id: &str) -> Result<StatusReport, ApiError> {
        let auth = self.bearer()?;
        self.execute(
            self.client
                .get(self.url(&format!("/api/agents/{agent}/upload/status/{job_id}")))
                .header(AUTHORIZATION, auth),
        )
        .await
    }
}
