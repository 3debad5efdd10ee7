use std::time::Duration;

use crate::{FileAttachment, UploadMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the submission to the backend.
    SubmitUpload {
        agent: String,
        request: UploadRequest,
    },
    /// Query the job status now.
    PollStatus { agent: String, job_id: String },
    /// Wake the poller for this agent's job after `delay`.
    SchedulePoll { agent: String, delay: Duration },
    /// Re-fetch the agent list so file and chunk counts are current.
    RefreshAgents,
    /// Drop the agent's terminal status panel after `delay`.
    ScheduleHide { agent: String, delay: Duration },
}

/// Validated submission, normalized and ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    Files(Vec<FileAttachment>),
    Text { content: String, title: String },
    Links { urls: Vec<String> },
}

impl UploadRequest {
    pub fn mode(&self) -> UploadMode {
        match self {
            UploadRequest::Files(_) => UploadMode::Files,
            UploadRequest::Text { .. } => UploadMode::Text,
            UploadRequest::Links { .. } => UploadMode::Links,
        }
    }
}
