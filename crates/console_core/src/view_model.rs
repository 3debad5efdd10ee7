use crate::{AgentSummary, JobStatus, ProgressSnapshot, UploadJob, UploadMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub agents: Vec<AgentSummary>,
    pub uploads: Vec<UploadPanelView>,
    /// Agents with an active job; submissions for these are blocked.
    pub busy_agents: Vec<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn upload(&self, agent: &str) -> Option<&UploadPanelView> {
        self.uploads.iter().find(|panel| panel.agent == agent)
    }
}

/// Presentation state for one agent's upload status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPanelView {
    pub agent: String,
    pub mode: UploadMode,
    pub status: JobStatus,
    pub busy: bool,
    pub visible: bool,
    pub progress_text: Option<String>,
    pub result: Option<String>,
}

impl UploadPanelView {
    pub(crate) fn from_job(job: &UploadJob) -> Self {
        Self {
            agent: job.agent.clone(),
            mode: job.mode,
            status: job.status,
            busy: !job.status.is_terminal(),
            visible: job.visible,
            progress_text: job.snapshot.as_ref().map(format_progress),
            result: job.result.clone(),
        }
    }
}

/// Renders the last status payload in the fixed panel format. Counts and
/// message come from the backend verbatim.
pub fn format_progress(snapshot: &ProgressSnapshot) -> String {
    let message = snapshot.message.as_deref().unwrap_or("Processing...");
    format!(
        "Status: {}\nProgress: {}/{} files\nProcessed: {}\nSkipped: {}\nFailed: {}\n\n{}",
        snapshot.status_label,
        snapshot.progress,
        snapshot.total_files,
        snapshot.processed,
        snapshot.skipped,
        snapshot.failed,
        message,
    )
}
