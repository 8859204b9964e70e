//! End-to-end edit flows through the editor state machine

use std::collections::BTreeSet;

use automaton_canvas::core::{Graph, State, Token, Transition, TransitionId};
use automaton_canvas::editor::{
    ArrowAction, EditError, EditMode, Editor, Notice, PaletteState, Pending, Prompt, StateAction,
};

fn graph() -> Graph {
    Graph::new(
        false,
        vec![
            State::new(0, "p").start(),
            State::new(1, "q"),
            State::new(2, "r").accepting(),
            State::new(3, "s"),
        ],
        vec![
            Transition::new(0, 0, 1, 'a'),
            Transition::new(1, 0, 1, 'b'),
            Transition::new(2, 1, 2, 'a'),
            Transition::new(3, 2, 3, '1'),
        ],
    )
    .unwrap()
}

fn ids(list: &[TransitionId]) -> BTreeSet<TransitionId> {
    list.iter().copied().collect()
}

fn tokens_between(graph: &Graph, from: u32, to: u32) -> Vec<(TransitionId, char)> {
    graph
        .transitions()
        .iter()
        .filter(|t| t.from == from && t.to == to)
        .map(|t| (t.id, t.token.as_char()))
        .collect()
}

/// Walk the "add transitions" flow up to the token prompt
fn start_adding(editor: &mut Editor, graph: &Graph, from: u32, to: u32) {
    editor.tap_state(graph, from).unwrap();
    editor
        .choose_state_action(graph, StateAction::AddTransitions)
        .unwrap();
    let prompt = editor.tap_state(graph, to).unwrap().prompt;
    assert!(matches!(prompt, Some(Prompt::TextInput { allow_epsilon: true, .. })));
    assert_eq!(editor.pending(), Some(&Pending::NewTransitions { from, to }));
}

#[test]
fn test_add_transitions_flow() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 3, 0);
    let outcome = editor.submit_text(&g, " x , y ").unwrap();
    let edited = outcome.graph.unwrap();
    assert!(outcome.notices.is_empty());
    // fresh ids are the smallest unused ones
    assert_eq!(tokens_between(&edited, 3, 0), vec![(4, 'x'), (5, 'y')]);
    assert_eq!(editor.mode(), &EditMode::Idle);
    assert_eq!(editor.pending(), None);
}

#[test]
fn test_batch_of_duplicates_raises_one_notice() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 2, 3);
    let outcome = editor.submit_text(&g, "1,1").unwrap();
    assert_eq!(outcome.notices, vec![Notice::AlreadyExists]);
    assert!(outcome.graph.is_none());
    assert_eq!(Notice::AlreadyExists.message(), "Transition(s) already exist");
}

#[test]
fn test_partial_duplicate_adds_the_rest() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 2, 3);
    let outcome = editor.submit_text(&g, "1,0").unwrap();
    assert_eq!(outcome.notices, vec![Notice::AlreadyExists]);
    let edited = outcome.graph.unwrap();
    assert_eq!(tokens_between(&edited, 2, 3), vec![(3, '1'), (4, '0')]);
}

#[test]
fn test_bad_token_text_is_a_notice() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 0, 2);
    let outcome = editor.submit_text(&g, "ab,c").unwrap();
    assert!(outcome.graph.is_none());
    assert!(matches!(outcome.notices.as_slice(), [Notice::InvalidTokenFormat { .. }]));
    assert_eq!(editor.mode(), &EditMode::Idle);
}

#[test]
fn test_empty_token_text_changes_nothing() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 0, 2);
    assert!(editor.submit_text(&g, "").unwrap().is_empty());
    assert_eq!(editor.mode(), &EditMode::Idle);
}

#[test]
fn test_epsilon_button() {
    let g = graph();
    let mut editor = Editor::editing();
    start_adding(&mut editor, &g, 1, 1);
    let edited = editor.add_epsilon(&g).unwrap().graph.unwrap();
    assert_eq!(tokens_between(&edited, 1, 1), vec![(4, 'ε')]);
}

#[test]
fn test_set_editable_off_resets_selection() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0, 1])).unwrap();
    assert_eq!(editor.mode(), &EditMode::TransitionSelected(ids(&[0, 1])));
    editor.set_editable(false);
    assert_eq!(editor.mode(), &EditMode::Idle);
    assert!(!editor.render_options().editable);

    editor.set_editable(true);
    editor.tap_arrow(&g, &ids(&[2])).unwrap();
    editor.choose_arrow_action(&g, ArrowAction::ChangeEnd).unwrap();
    assert_eq!(editor.mode(), &EditMode::AwaitingRetargetEnd(ids(&[2])));
    editor.set_editable(false);
    assert_eq!(editor.mode(), &EditMode::Idle);
    // taps are ignored until editing is back on
    assert!(editor.tap_state(&g, 0).unwrap().is_empty());
}

#[test]
fn test_change_end() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0, 1])).unwrap();
    let prompt = editor.choose_arrow_action(&g, ArrowAction::ChangeEnd).unwrap().prompt;
    assert!(matches!(prompt, Some(Prompt::PickState { .. })));
    let edited = editor.tap_state(&g, 3).unwrap().graph.unwrap();
    assert_eq!(tokens_between(&edited, 0, 3), vec![(0, 'a'), (1, 'b')]);
    assert!(tokens_between(&edited, 0, 1).is_empty());
}

#[test]
fn test_retarget_onto_existing_transition_deletes_it() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[2])).unwrap();
    editor.choose_arrow_action(&g, ArrowAction::ChangeStart).unwrap();
    let edited = editor.tap_state(&g, 0).unwrap().graph.unwrap();
    assert_eq!(tokens_between(&edited, 0, 2), vec![(2, 'a')]);

    let mut editor = Editor::editing();
    editor.tap_arrow(&edited, &ids(&[0, 1])).unwrap();
    editor.choose_arrow_action(&edited, ArrowAction::ChangeEnd).unwrap();
    let merged = editor.tap_state(&edited, 2).unwrap().graph.unwrap();
    // 'a' already runs p→r, so transition 0 is dropped; 'b' moves over
    let mut pair = tokens_between(&merged, 0, 2);
    pair.sort();
    assert_eq!(pair, vec![(1, 'b'), (2, 'a')]);
    assert!(merged.transition(0).is_none());
}

#[test]
fn test_change_tokens_keeps_surviving_ids() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0, 1])).unwrap();
    editor.choose_arrow_action(&g, ArrowAction::ChangeTokens).unwrap();
    let edited = editor.submit_text(&g, "b, c, c").unwrap().graph.unwrap();
    let mut pair = tokens_between(&edited, 0, 1);
    pair.sort();
    assert_eq!(pair, vec![(1, 'b'), (4, 'c')]);
    assert!(edited.transition(0).is_none());
    assert_eq!(edited.transitions().len(), 4);
}

#[test]
fn test_change_tokens_rejects_bad_text() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0, 1])).unwrap();
    editor.choose_arrow_action(&g, ArrowAction::ChangeTokens).unwrap();
    let outcome = editor.submit_text(&g, "").unwrap();
    assert!(outcome.graph.is_none());
    assert!(matches!(outcome.notices.as_slice(), [Notice::InvalidTokenFormat { .. }]));
}

#[test]
fn test_epsilon_toggle_adds_then_removes() {
    let g = graph();
    let mut editor = Editor::editing();
    let menu = editor.tap_arrow(&g, &ids(&[0, 1])).unwrap().prompt;
    let Some(Prompt::ArrowMenu { options, .. }) = menu else {
        panic!("expected arrow menu");
    };
    assert!(options.iter().any(|o| o.label == "Add ε Transition"));

    let added = editor
        .choose_arrow_action(&g, ArrowAction::ToggleEpsilon)
        .unwrap()
        .graph
        .unwrap();
    assert_eq!(
        tokens_between(&added, 0, 1),
        vec![(0, 'a'), (1, 'b'), (4, 'ε')]
    );

    let menu = editor.tap_arrow(&added, &ids(&[0, 1, 4])).unwrap().prompt;
    let Some(Prompt::ArrowMenu { options, .. }) = menu else {
        panic!("expected arrow menu");
    };
    assert!(options.iter().any(|o| o.label == "Remove ε transition"));
    let removed = editor
        .choose_arrow_action(&added, ArrowAction::ToggleEpsilon)
        .unwrap()
        .graph
        .unwrap();
    assert_eq!(removed, g);
}

#[test]
fn test_delete_state_cascades() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_state(&g, 1).unwrap();
    let prompt = editor.choose_state_action(&g, StateAction::Delete).unwrap().prompt;
    assert!(matches!(prompt, Some(Prompt::Confirm { ref confirm_label, .. }) if confirm_label == "Delete State"));
    let edited = editor.confirm(&g).unwrap().graph.unwrap();
    assert!(edited.state(1).is_none());
    assert_eq!(edited.transitions().len(), 1);
    assert_eq!(edited.transitions()[0].id, 3);
}

#[test]
fn test_delete_transitions() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0, 1])).unwrap();
    editor.choose_arrow_action(&g, ArrowAction::Delete).unwrap();
    assert_eq!(editor.pending(), Some(&Pending::DeleteTransitions(ids(&[0, 1]))));
    let edited = editor.confirm(&g).unwrap().graph.unwrap();
    assert!(tokens_between(&edited, 0, 1).is_empty());
    assert_eq!(edited.states().len(), 4);
}

#[test]
fn test_toggle_start_allows_several() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_state(&g, 3).unwrap();
    let edited = editor
        .choose_state_action(&g, StateAction::ToggleStart)
        .unwrap()
        .graph
        .unwrap();
    assert_eq!(edited.start_states().count(), 2);
}

#[test]
fn test_rename() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_state(&g, 2).unwrap();
    editor.choose_state_action(&g, StateAction::Rename).unwrap();
    let edited = editor.submit_text(&g, "done").unwrap().graph.unwrap();
    assert_eq!(edited.state(2).unwrap().name, "done");
}

#[test]
fn test_tap_while_input_pending_is_rejected() {
    let g = graph();
    let mut editor = Editor::editing();
    editor.tap_state(&g, 2).unwrap();
    editor.choose_state_action(&g, StateAction::Rename).unwrap();
    let err = editor.tap_state(&g, 0).unwrap_err();
    assert!(matches!(err, EditError::InvalidInMode { .. }));
    assert_eq!(editor.mode(), &EditMode::Idle);
    assert_eq!(editor.pending(), None);
}

#[test]
fn test_unknown_arrow_members() {
    let mut editor = Editor::editing();
    let err = editor.tap_arrow(&graph(), &ids(&[0, 42])).unwrap_err();
    assert_eq!(err, EditError::UnknownTransition { id: 42 });
    let err = editor.tap_arrow(&graph(), &BTreeSet::new()).unwrap_err();
    assert_eq!(err, EditError::EmptySelection);
}

#[test]
fn test_palette_names_after_new_id() {
    let g = Graph::new(
        false,
        vec![State::new(0, "a"), State::new(2, "c")],
        Vec::new(),
    )
    .unwrap();
    let mut editor = Editor::editing();
    let edited = editor
        .add_state(&g, PaletteState::Accepting)
        .unwrap()
        .graph
        .unwrap();
    let added = edited.state(1).unwrap();
    assert_eq!(added.name, "q1");
    assert!(added.is_final && !added.is_start);

    let edited = editor
        .add_state(&edited, PaletteState::Start)
        .unwrap()
        .graph
        .unwrap();
    assert!(edited.state(3).unwrap().is_start);
    assert_eq!(edited.state(3).unwrap().name, "q3");
}

#[test]
fn test_edits_never_touch_the_input_graph() {
    let g = graph();
    let snapshot = g.clone();
    let mut editor = Editor::editing();
    editor.tap_state(&g, 0).unwrap();
    editor.choose_state_action(&g, StateAction::Delete).unwrap();
    let edited = editor.confirm(&g).unwrap().graph.unwrap();
    assert_ne!(edited, g);
    assert_eq!(g, snapshot);
    // an untouched draft commits back to an equal graph
    assert_eq!(g.clone_graph().commit(), g);
}

#[test]
fn test_token_display_in_placeholder() {
    let g = Graph::new(
        false,
        vec![State::new(0, "p")],
        vec![Transition::new(0, 0, 0, Token::EPSILON)],
    )
    .unwrap();
    let mut editor = Editor::editing();
    editor.tap_arrow(&g, &ids(&[0])).unwrap();
    let prompt = editor.choose_arrow_action(&g, ArrowAction::ChangeTokens).unwrap().prompt;
    assert!(matches!(prompt, Some(Prompt::TextInput { ref placeholder, .. }) if placeholder == "ε"));
}
