use crate::{
    AppState, Effect, JobStatus, Msg, ProgressSnapshot, UploadMode, UploadPayload, UploadRequest,
};

/// Result text when the attempt budget runs out while still processing.
/// Advisory only: the backend may still finish the job server-side.
const TIMED_OUT_RESULT: &str = "Status check timed out. Files may still be processing.";
/// Result text for transport or parse failures while polling.
const STATUS_ERROR_RESULT: &str = "Error checking upload status";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let timings = state.timings();
    let effects = match msg {
        Msg::UploadRequested { agent, payload } => {
            // The per-agent job slot enforces at most one active job per
            // agent; a second submission is blocked, not queued.
            if state.has_active_job(&agent) {
                return (state, Vec::new());
            }
            let mode = payload.mode();
            let Some(request) = normalize_payload(payload) else {
                // Empty submission: rejected before any network effect.
                return (state, Vec::new());
            };
            state.begin_upload(&agent, mode);
            vec![Effect::SubmitUpload { agent, request }]
        }
        Msg::UploadAccepted {
            agent,
            job_id,
            message,
        } => match job_id {
            Some(id) => {
                if state.record_accept(&agent, id.clone()) {
                    // First poll goes out immediately; the cadence delay
                    // only applies between polls.
                    vec![Effect::PollStatus { agent, job_id: id }]
                } else {
                    Vec::new()
                }
            }
            None => {
                // Synchronous completion: terminal without any polling.
                let mode = state.job(&agent).map(|job| job.mode);
                let result = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| sync_result_text(mode).to_string());
                if state.record_terminal(&agent, JobStatus::Completed, result) {
                    vec![
                        Effect::RefreshAgents,
                        Effect::ScheduleHide {
                            agent,
                            delay: timings.hold_sync,
                        },
                    ]
                } else {
                    Vec::new()
                }
            }
        },
        Msg::UploadRejected { agent, message } => {
            if state.record_terminal(&agent, JobStatus::Errored, message) {
                vec![Effect::ScheduleHide {
                    agent,
                    delay: timings.hold_errored,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::PollDue { agent } => match state.prepare_poll(&agent) {
            Some(job_id) => vec![Effect::PollStatus { agent, job_id }],
            // Stale wakeup for a finished or dismissed job.
            None => Vec::new(),
        },
        Msg::StatusReceived { agent, report } => {
            if !state.has_active_job(&agent) {
                // Late reply after a terminal transition; absorb it.
                return (state, Vec::new());
            }
            state.record_snapshot(&agent, ProgressSnapshot::from_report(&report));
            match report.status.as_str() {
                "processing" => {
                    if state.job_attempts(&agent) < timings.max_poll_attempts {
                        state.mark_processing(&agent);
                        vec![Effect::SchedulePoll {
                            agent,
                            delay: timings.poll_interval,
                        }]
                    } else {
                        // Attempt budget exhausted. The notice stays on
                        // screen; no hide is scheduled.
                        state.record_terminal(
                            &agent,
                            JobStatus::TimedOut,
                            TIMED_OUT_RESULT.to_string(),
                        );
                        Vec::new()
                    }
                }
                "completed" => {
                    let result = report
                        .message
                        .clone()
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| "Processing completed".to_string());
                    state.record_terminal(&agent, JobStatus::Completed, result);
                    vec![
                        Effect::RefreshAgents,
                        Effect::ScheduleHide {
                            agent,
                            delay: timings.hold_completed,
                        },
                    ]
                }
                "failed" => {
                    let detail = report.message.clone().unwrap_or_default();
                    state.record_terminal(
                        &agent,
                        JobStatus::Failed,
                        format!("Processing failed: {detail}"),
                    );
                    vec![Effect::ScheduleHide {
                        agent,
                        delay: timings.hold_failed,
                    }]
                }
                _ => {
                    // Unknown status string counts as a client-side error.
                    state.record_terminal(
                        &agent,
                        JobStatus::Errored,
                        STATUS_ERROR_RESULT.to_string(),
                    );
                    vec![Effect::ScheduleHide {
                        agent,
                        delay: timings.hold_errored,
                    }]
                }
            }
        }
        Msg::StatusFailed { agent } => {
            // One failed poll ends the loop; no same-invocation retry.
            if state.record_terminal(&agent, JobStatus::Errored, STATUS_ERROR_RESULT.to_string()) {
                vec![Effect::ScheduleHide {
                    agent,
                    delay: timings.hold_errored,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::AgentsRefreshed { agents } => {
            state.set_agents(agents);
            Vec::new()
        }
        Msg::PanelDismissed { agent } => {
            if state.has_active_job(&agent) {
                // Keep polling in the background; the terminal transition
                // re-shows the panel so the notification is not lost.
                state.hide_panel(&agent);
            } else {
                state.drop_terminal_job(&agent);
            }
            Vec::new()
        }
        Msg::HoldExpired { agent } => {
            state.drop_terminal_job(&agent);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn normalize_payload(payload: UploadPayload) -> Option<UploadRequest> {
    match payload {
        UploadPayload::Files(files) => {
            if files.is_empty() {
                None
            } else {
                Some(UploadRequest::Files(files))
            }
        }
        UploadPayload::Text { content, title } => {
            if content.trim().is_empty() {
                None
            } else {
                let title = title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Text Content".to_string());
                Some(UploadRequest::Text { content, title })
            }
        }
        UploadPayload::Links { raw } => {
            let urls = parse_links(&raw);
            if urls.is_empty() {
                None
            } else {
                Some(UploadRequest::Links { urls })
            }
        }
    }
}

fn parse_links(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn sync_result_text(mode: Option<UploadMode>) -> &'static str {
    match mode {
        Some(UploadMode::Text) => "Text processed successfully!",
        Some(UploadMode::Links) => "Links processed successfully!",
        _ => "Upload completed successfully!",
    }
}
