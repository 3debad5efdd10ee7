use std::sync::Once;

use console_core::{
    update, AppState, Effect, FileAttachment, JobStatus, Msg, StatusReport, UploadPayload,
    UploadRequest,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn file_payload(names: &[&str]) -> UploadPayload {
    UploadPayload::Files(
        names
            .iter()
            .map(|name| FileAttachment {
                name: name.to_string(),
                bytes: b"content".to_vec(),
            })
            .collect(),
    )
}

fn processing_report(progress: u64, total: u64) -> StatusReport {
    StatusReport {
        status: "processing".to_string(),
        progress,
        total_files: total,
        ..StatusReport::default()
    }
}

#[test]
fn files_job_polls_to_completion() {
    init_logging();
    let state = AppState::new();

    // Submission emits exactly one backend effect.
    let (state, effects) = update(
        state,
        Msg::UploadRequested {
            agent: "forklift".to_string(),
            payload: file_payload(&["manual.pdf"]),
        },
    );
    assert_eq!(effects.len(), 1);
    assert!(matches!(
        &effects[0],
        Effect::SubmitUpload { agent, request: UploadRequest::Files(files) }
            if agent == "forklift" && files.len() == 1
    ));
    assert!(state.has_active_job("forklift"));

    // Accept with a job id triggers the first poll immediately.
    let (state, effects) = update(
        state,
        Msg::UploadAccepted {
            agent: "forklift".to_string(),
            job_id: Some("j1".to_string()),
            message: None,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::PollStatus {
            agent: "forklift".to_string(),
            job_id: "j1".to_string(),
        }]
    );
    assert_eq!(state.job("forklift").unwrap().attempts, 1);

    // First poll: processing. The next poll is only scheduled, not issued.
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            agent: "forklift".to_string(),
            report: processing_report(0, 1),
        },
    );
    assert_eq!(effects.len(), 1);
    assert!(matches!(&effects[0], Effect::SchedulePoll { agent, .. } if agent == "forklift"));
    assert_eq!(state.job("forklift").unwrap().status, JobStatus::Processing);

    let (state, effects) = update(
        state,
        Msg::PollDue {
            agent: "forklift".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::PollStatus {
            agent: "forklift".to_string(),
            job_id: "j1".to_string(),
        }]
    );

    // Second poll: completed. Result comes from the backend verbatim and
    // the agent list refresh is requested.
    let (mut state, effects) = update(
        state,
        Msg::StatusReceived {
            agent: "forklift".to_string(),
            report: StatusReport {
                status: "completed".to_string(),
                progress: 1,
                total_files: 1,
                message: Some("Indexed 1 file".to_string()),
                ..StatusReport::default()
            },
        },
    );
    assert!(matches!(effects[0], Effect::RefreshAgents));
    assert!(matches!(&effects[1], Effect::ScheduleHide { agent, .. } if agent == "forklift"));

    let view = state.view();
    let panel = view.upload("forklift").unwrap();
    assert_eq!(panel.status, JobStatus::Completed);
    assert_eq!(panel.result.as_deref(), Some("Indexed 1 file"));
    assert!(!panel.busy);
    assert!(view.busy_agents.is_empty());
    assert!(state.consume_dirty());

    // No further poll after the terminal state.
    let (_state, effects) = update(
        state,
        Msg::PollDue {
            agent: "forklift".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn synchronous_completion_skips_polling() {
    init_logging();
    let state = AppState::new();

    let (state, _effects) = update(
        state,
        Msg::UploadRequested {
            agent: "kb1".to_string(),
            payload: UploadPayload::Text {
                content: "hello".to_string(),
                title: Some("Note".to_string()),
            },
        },
    );

    let (state, effects) = update(
        state,
        Msg::UploadAccepted {
            agent: "kb1".to_string(),
            job_id: None,
            message: Some("Text processed".to_string()),
        },
    );
    assert!(matches!(effects[0], Effect::RefreshAgents));
    assert!(
        !effects
            .iter()
            .any(|effect| matches!(effect, Effect::PollStatus { .. }))
    );

    let view = state.view();
    let panel = view.upload("kb1").unwrap();
    assert_eq!(panel.status, JobStatus::Completed);
    assert_eq!(panel.result.as_deref(), Some("Text processed"));
    assert!(!panel.busy);
}

#[test]
fn attempt_budget_exhaustion_times_out() {
    init_logging();
    let state = AppState::new();
    let max_attempts = state.timings().max_poll_attempts;

    let (state, _effects) = update(
        state,
        Msg::UploadRequested {
            agent: "slow".to_string(),
            payload: file_payload(&["big.pdf"]),
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::UploadAccepted {
            agent: "slow".to_string(),
            job_id: Some("j9".to_string()),
            message: None,
        },
    );
    let mut polls_issued = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::PollStatus { .. }))
        .count();

    // Keep answering "processing" until the budget runs out.
    loop {
        let (next, effects) = update(
            state,
            Msg::StatusReceived {
                agent: "slow".to_string(),
                report: processing_report(0, 1),
            },
        );
        state = next;
        if state.job("slow").unwrap().status == JobStatus::TimedOut {
            assert!(effects.is_empty());
            break;
        }
        assert!(matches!(&effects[0], Effect::SchedulePoll { .. }));

        let (next, effects) = update(
            state,
            Msg::PollDue {
                agent: "slow".to_string(),
            },
        );
        state = next;
        assert_eq!(effects.len(), 1);
        polls_issued += 1;
    }

    assert_eq!(polls_issued, max_attempts as usize);
    assert_eq!(state.job("slow").unwrap().attempts, max_attempts);
    let view = state.view();
    let panel = view.upload("slow").unwrap();
    assert!(panel.result.as_deref().unwrap().contains("timed out"));
    assert!(!panel.busy);

    // The budget is a hard stop: no poll number `max_attempts + 1`.
    let (_state, effects) = update(
        state,
        Msg::PollDue {
            agent: "slow".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn poll_transport_failure_errors_without_retry() {
    init_logging();
    let state = AppState::new();

    let (state, _effects) = update(
        state,
        Msg::UploadRequested {
            agent: "flaky".to_string(),
            payload: file_payload(&["doc.md"]),
        },
    );
    let (state, _effects) = update(
        state,
        Msg::UploadAccepted {
            agent: "flaky".to_string(),
            job_id: Some("j2".to_string()),
            message: None,
        },
    );

    let (state, effects) = update(
        state,
        Msg::StatusFailed {
            agent: "flaky".to_string(),
        },
    );
    // The loop ends: only the hide timer remains, no new poll.
    assert_eq!(effects.len(), 1);
    assert!(matches!(&effects[0], Effect::ScheduleHide { .. }));

    let view = state.view();
    let panel = view.upload("flaky").unwrap();
    assert_eq!(panel.status, JobStatus::Errored);
    assert_eq!(panel.result.as_deref(), Some("Error checking upload status"));
    assert!(!panel.busy);
}

#[test]
fn empty_submissions_are_rejected_before_any_effect() {
    init_logging();
    let state = AppState::new();

    let (state, effects) = update(
        state,
        Msg::UploadRequested {
            agent: "forklift".to_string(),
            payload: UploadPayload::Files(Vec::new()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.job("forklift").is_none());

    let (state, effects) = update(
        state,
        Msg::UploadRequested {
            agent: "forklift".to_string(),
            payload: UploadPayload::Text {
                content: "   \n".to_string(),
                title: None,
            },
        },
    );
    assert!(effects.is_empty());
    assert!(state.job("forklift").is_none());

    let (state, effects) = update(
        state,
        Msg::UploadRequested {
            agent: "forklift".to_string(),
            payload: UploadPayload::Links {
                raw: "  \n\n   \n".to_string(),
            },
        },
    );
    assert!(effects.is_empty());
    assert!(state.job("forklift").is_none());
}

#[test]
fn link_lines_are_trimmed_and_blank_lines_dropped() {
    init_logging();
    let state = AppState::new();

    let (_state, effects) = update(
        state,
        Msg::UploadRequested {
            agent: "docs".to_string(),
            payload: UploadPayload::Links {
                raw: " https://a.example.com \n\nhttps://b.example.com\n   \n".to_string(),
            },
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SubmitUpload {
            agent: "docs".to_string(),
            request: UploadRequest::Links {
                urls: vec![
                    "https://a.example.com".to_string(),
                    "https://b.example.com".to_string(),
                ],
            },
        }]
    );
}
