use std::sync::{mpsc, Arc};
use std::thread;

use console_core::{
    update, AgentSummary, AppState, AppViewModel, Effect, Msg, StatusReport as CoreStatusReport,
    Timings, UploadMode, UploadPayload, UploadRequest,
};
use console_logging::{console_info, console_warn};

use crate::backend::Backend;
use crate::types::{AgentRecord, ApiError, StatusReport};

/// Executes core effects on a background tokio runtime and feeds the
/// resulting messages back over the channel. Each effect runs as its own
/// task, so poll timers for different agents interleave freely while one
/// job's polls stay strictly sequential (the next poll is only scheduled
/// by the previous poll's reply).
pub struct EffectRunner {
    cmd_tx: mpsc::Sender<Effect>,
}

impl EffectRunner {
    pub fn new(backend: Arc<dyn Backend>, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(effect) = cmd_rx.recv() {
                let backend = backend.clone();
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    run_effect(backend, effect, msg_tx).await;
                });
            }
        });

        Self { cmd_tx }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self.cmd_tx.send(effect);
        }
    }
}

async fn run_effect(backend: Arc<dyn Backend>, effect: Effect, msg_tx: mpsc::Sender<Msg>) {
    match effect {
        Effect::SubmitUpload { agent, request } => {
            let mode = request.mode();
            let outcome = match request {
                UploadRequest::Files(files) => backend.upload_files(&agent, files).await,
                UploadRequest::Text { content, title } => {
                    backend.upload_text(&agent, &content, &title).await
                }
                UploadRequest::Links { urls } => backend.upload_links(&agent, &urls).await,
            };
            let msg = match outcome {
                Ok(accept) => {
                    console_info!(
                        "upload accepted agent={} job_id={:?}",
                        agent,
                        accept.job_id
                    );
                    Msg::UploadAccepted {
                        agent,
                        job_id: accept.job_id,
                        message: accept.message,
                    }
                }
                Err(err) => {
                    console_warn!("upload submit failed agent={}: {}", agent, err);
                    Msg::UploadRejected {
                        agent,
                        message: rejection_text(mode, &err),
                    }
                }
            };
            let _ = msg_tx.send(msg);
        }
        Effect::PollStatus { agent, job_id } => match backend.job_status(&agent, &job_id).await {
            Ok(report) => {
                let _ = msg_tx.send(Msg::StatusReceived {
                    agent,
                    report: map_report(report),
                });
            }
            Err(err) => {
                console_warn!(
                    "status poll failed agent={} job_id={}: {}",
                    agent,
                    job_id,
                    err
                );
                let _ = msg_tx.send(Msg::StatusFailed { agent });
            }
        },
        Effect::SchedulePoll { agent, delay } => {
            tokio::time::sleep(delay).await;
            let _ = msg_tx.send(Msg::PollDue { agent });
        }
        Effect::RefreshAgents => match backend.list_agents().await {
            Ok(records) => {
                let _ = msg_tx.send(Msg::AgentsRefreshed {
                    agents: records.into_iter().map(map_agent).collect(),
                });
            }
            Err(err) => console_warn!("agent refresh failed: {}", err),
        },
        Effect::ScheduleHide { agent, delay } => {
            tokio::time::sleep(delay).await;
            let _ = msg_tx.send(Msg::HoldExpired { agent });
        }
    }
}

/// User-facing rejection text: the backend's own message when it sent
/// one, otherwise a generic line for the channel that failed.
fn rejection_text(mode: UploadMode, err: &ApiError) -> String {
    if let ApiError::BackendRejected { message, .. } = err {
        if !message.trim().is_empty() {
            return message.clone();
        }
    }
    match mode {
        UploadMode::Files => "Upload failed. Please try again.",
        UploadMode::Text => "Text processing failed. Please try again.",
        UploadMode::Links => "Link processing failed. Please try again.",
    }
    .to_string()
}

fn map_report(report: StatusReport) -> CoreStatusReport {
    CoreStatusReport {
        status: report.status,
        progress: report.progress,
        total_files: report.total_files,
        processed_files: report.processed_files,
        skipped_files: report.skipped_files,
        failed_files: report.failed_files,
        message: report.message,
    }
}

fn map_agent(record: AgentRecord) -> AgentSummary {
    AgentSummary {
        name: record.name,
        description: record.description,
        total_files: record.total_files,
        total_chunks: record.total_chunks,
    }
}

/// Owns the upload state machine and pumps IO-produced messages through
/// it. All state mutation happens on the caller's thread inside
/// `dispatch`, so a callback's updates are never observed half-applied.
pub struct ConsoleSession {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl ConsoleSession {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_timings(backend, Timings::default())
    }

    pub fn with_timings(backend: Arc<dyn Backend>, timings: Timings) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(backend, msg_tx);
        Self {
            state: AppState::with_timings(timings),
            runner,
            msg_rx,
        }
    }

    pub fn submit(&mut self, agent: &str, payload: UploadPayload) {
        self.dispatch(Msg::UploadRequested {
            agent: agent.to_string(),
            payload,
        });
    }

    pub fn dismiss(&mut self, agent: &str) {
        self.dispatch(Msg::PanelDismissed {
            agent: agent.to_string(),
        });
    }

    pub fn refresh_agents(&self) {
        self.runner.run(vec![Effect::RefreshAgents]);
    }

    /// Drains messages produced by background IO and applies them.
    /// Returns whether the view changed since the last pump.
    pub fn pump(&mut self) -> bool {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        for msg in inbox {
            self.dispatch(msg);
        }
        self.state.consume_dirty()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }
}
