use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{AppViewModel, UploadPanelView};

/// Ingestion channel used for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Files,
    Text,
    Links,
}

/// A file selected for ingestion, held as pure data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Raw user input for a submission, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    Files(Vec<FileAttachment>),
    Text {
        content: String,
        title: Option<String>,
    },
    /// One URL per line, as typed into the links box.
    Links { raw: String },
}

impl UploadPayload {
    pub fn mode(&self) -> UploadMode {
        match self {
            UploadPayload::Files(_) => UploadMode::Files,
            UploadPayload::Text { .. } => UploadMode::Text,
            UploadPayload::Links { .. } => UploadMode::Links,
        }
    }
}

/// Client-observed job state. `Submitted` and `Processing` are active;
/// every other state is terminal and absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
    TimedOut,
    Errored,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Submitted | JobStatus::Processing)
    }
}

/// Status payload from the backend, carried verbatim into the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub status: String,
    pub progress: u64,
    pub total_files: u64,
    pub processed_files: Vec<String>,
    pub skipped_files: Vec<String>,
    pub failed_files: Vec<String>,
    pub message: Option<String>,
}

/// Last status payload seen for a job. Counts come from the backend
/// lists as-is; the poller never recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub status_label: String,
    pub progress: u64,
    pub total_files: u64,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub message: Option<String>,
}

impl ProgressSnapshot {
    pub fn from_report(report: &StatusReport) -> Self {
        Self {
            status_label: report.status.clone(),
            progress: report.progress,
            total_files: report.total_files,
            processed: report.processed_files.len(),
            skipped: report.skipped_files.len(),
            failed: report.failed_files.len(),
            message: report.message.clone(),
        }
    }
}

/// One tracked ingestion request for an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    /// Backend-assigned identifier; absent until accepted, and for
    /// synchronously completed submissions.
    pub job_id: Option<String>,
    pub agent: String,
    pub mode: UploadMode,
    pub status: JobStatus,
    /// Status polls issued so far; never exceeds `Timings::max_poll_attempts`.
    pub attempts: u32,
    pub snapshot: Option<ProgressSnapshot>,
    pub result: Option<String>,
    /// Whether the status panel is shown. Dismissing an active job only
    /// hides the panel; a terminal transition makes it visible again.
    pub visible: bool,
}

impl UploadJob {
    fn pending(agent: &str, mode: UploadMode) -> Self {
        Self {
            job_id: None,
            agent: agent.to_string(),
            mode,
            status: JobStatus::Submitted,
            attempts: 0,
            snapshot: None,
            result: None,
            visible: true,
        }
    }
}

/// Agent list entry, refreshed after completed ingestions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentSummary {
    pub name: String,
    pub description: String,
    pub total_files: u64,
    pub total_chunks: u64,
}

/// Polling cadence, attempt budget, and display-hold durations. Tests
/// shrink these to run the machine at millisecond cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub hold_sync: Duration,
    pub hold_completed: Duration,
    pub hold_failed: Duration,
    pub hold_errored: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            // 6 minutes of polling at the default cadence.
            max_poll_attempts: 120,
            hold_sync: Duration::from_secs(5),
            hold_completed: Duration::from_secs(8),
            hold_failed: Duration::from_secs(12),
            hold_errored: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    /// Keyed by agent name, so at most one job per agent can exist.
    jobs: BTreeMap<String, UploadJob>,
    agents: Vec<AgentSummary>,
    timings: Timings,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timings(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn job(&self, agent: &str) -> Option<&UploadJob> {
        self.jobs.get(agent)
    }

    pub fn has_active_job(&self, agent: &str) -> bool {
        self.jobs
            .get(agent)
            .is_some_and(|job| !job.status.is_terminal())
    }

    pub(crate) fn job_attempts(&self, agent: &str) -> u32 {
        self.jobs.get(agent).map_or(0, |job| job.attempts)
    }

    /// Insert a fresh pending job for `agent`, replacing any terminal
    /// leftover from a previous submission.
    pub(crate) fn begin_upload(&mut self, agent: &str, mode: UploadMode) {
        self.jobs
            .insert(agent.to_string(), UploadJob::pending(agent, mode));
        self.dirty = true;
    }

    /// Record the backend accept for an active job. Returns false if no
    /// active job exists for `agent`.
    pub(crate) fn record_accept(&mut self, agent: &str, job_id: String) -> bool {
        match self.jobs.get_mut(agent) {
            Some(job) if !job.status.is_terminal() => {
                job.job_id = Some(job_id);
                job.attempts = 1;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Count one more poll and return the job id to query, if the job is
    /// still active.
    pub(crate) fn prepare_poll(&mut self, agent: &str) -> Option<String> {
        let job = self.jobs.get_mut(agent)?;
        if job.status.is_terminal() {
            return None;
        }
        let job_id = job.job_id.clone()?;
        job.attempts += 1;
        self.dirty = true;
        Some(job_id)
    }

    pub(crate) fn record_snapshot(&mut self, agent: &str, snapshot: ProgressSnapshot) {
        if let Some(job) = self.jobs.get_mut(agent) {
            job.snapshot = Some(snapshot);
            self.dirty = true;
        }
    }

    pub(crate) fn mark_processing(&mut self, agent: &str) {
        if let Some(job) = self.jobs.get_mut(agent) {
            if !job.status.is_terminal() {
                job.status = JobStatus::Processing;
                self.dirty = true;
            }
        }
    }

    /// Move an active job to a terminal state. No-op once terminal, so
    /// late replies cannot re-transition a finished job.
    pub(crate) fn record_terminal(&mut self, agent: &str, status: JobStatus, result: String) -> bool {
        debug_assert!(status.is_terminal());
        match self.jobs.get_mut(agent) {
            Some(job) if !job.status.is_terminal() => {
                job.status = status;
                job.result = Some(result);
                job.visible = true;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn hide_panel(&mut self, agent: &str) {
        if let Some(job) = self.jobs.get_mut(agent) {
            if job.visible {
                job.visible = false;
                self.dirty = true;
            }
        }
    }

    /// Drop the job for `agent` if it reached a terminal state.
    pub(crate) fn drop_terminal_job(&mut self, agent: &str) {
        let terminal = self
            .jobs
            .get(agent)
            .is_some_and(|job| job.status.is_terminal());
        if terminal {
            self.jobs.remove(agent);
            self.dirty = true;
        }
    }

    pub(crate) fn set_agents(&mut self, agents: Vec<AgentSummary>) {
        self.agents = agents;
        self.dirty = true;
    }

    /// Returns whether a render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            agents: self.agents.clone(),
            uploads: self.jobs.values().map(UploadPanelView::from_job).collect(),
            busy_agents: self
                .jobs
                .values()
                .filter(|job| !job.status.is_terminal())
                .map(|job| job.agent.clone())
                .collect(),
            dirty: self.dirty,
        }
    }
}
