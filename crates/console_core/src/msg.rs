#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to ingest content for an agent.
    UploadRequested {
        agent: String,
        payload: crate::UploadPayload,
    },
    /// Backend accepted the submission. `job_id` is absent when the
    /// backend completed synchronously.
    UploadAccepted {
        agent: String,
        job_id: Option<String>,
        message: Option<String>,
    },
    /// Submission failed before a job was created; `message` is already
    /// user-facing.
    UploadRejected { agent: String, message: String },
    /// The inter-poll delay for an agent's job elapsed.
    PollDue { agent: String },
    /// Status payload received for an agent's job.
    StatusReceived {
        agent: String,
        report: crate::StatusReport,
    },
    /// The status request failed (transport or parse error).
    StatusFailed { agent: String },
    /// Fresh agent list fetched from the backend.
    AgentsRefreshed {
        agents: Vec<crate::AgentSummary>,
    },
    /// User dismissed the upload status panel for an agent.
    PanelDismissed { agent: String },
    /// The display hold after a terminal state elapsed.
    HoldExpired { agent: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
