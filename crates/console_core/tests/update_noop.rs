use console_core::{update, AgentSummary, AppState, Msg};

#[test]
fn noop_leaves_state_and_effects_empty() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn noop_does_not_disturb_populated_state() {
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::AgentsRefreshed {
            agents: vec![AgentSummary {
                name: "kb1".to_string(),
                ..AgentSummary::default()
            }],
        },
    );

    let (next, effects) = update(state.clone(), Msg::NoOp);
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
