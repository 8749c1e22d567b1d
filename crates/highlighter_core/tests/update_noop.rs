use highlighter_core::{update, AgentState, Msg};

#[test]
fn update_is_noop() {
    let state = AgentState::default();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
