//! Console core: pure upload-job state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, UploadRequest};
pub use msg::Msg;
pub use state::{
    AgentSummary, AppState, FileAttachment, JobStatus, ProgressSnapshot, StatusReport, Timings,
    UploadJob, UploadMode, UploadPayload,
};
pub use update::update;
pub use view_model::{format_progress, AppViewModel, UploadPanelView};
