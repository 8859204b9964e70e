//! Error messages surfaced to users and logs

use std::error::Error as _;

use automaton_canvas::core::{DiagramError, Graph, State, Structure, Transition};
use automaton_canvas::editor::EditError;
use automaton_canvas::engine::{
    parse_photo_output, parse_structure_output, EngineCall, EngineError, PhotoError,
    ValidationCode,
};
use automaton_canvas::gallery::GalleryError;
use automaton_canvas::workspace::WorkspaceError;

#[test]
fn test_graph_construction_errors() {
    let err = Graph::new(
        false,
        vec![State::new(0, "a")],
        vec![Transition::new(5, 0, 3, 'x')],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown state 3 referenced by transition 5");

    let err = Graph::new(
        false,
        vec![State::new(0, "a")],
        vec![Transition::new(1, 0, 0, 'x'), Transition::new(1, 0, 0, 'y')],
    )
    .unwrap_err();
    assert!(matches!(err, DiagramError::DuplicateId { kind: "transition", id: 1 }));
}

#[test]
fn test_draft_errors() {
    let mut draft = Structure::default_nfa().graph().clone_graph();
    assert!(matches!(
        draft.remove_state(42),
        Err(DiagramError::UnknownState { id: 42 })
    ));
    assert!(matches!(
        draft.add_transition(0, 42, 'a'.into()),
        Err(DiagramError::UnknownState { id: 42 })
    ));
    let err = draft.insert_transition(Transition::new(0, 0, 1, 'z')).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate transition id 0");
}

#[test]
fn test_parse_error_positions() {
    let err = Structure::from_json("{\n  \"type\": \"nfa\",\n  oops").unwrap_err();
    match err {
        DiagramError::ParseError { line, column, .. } => {
            assert_eq!(line, 3);
            assert!(column > 0);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_edit_errors_from_graph_errors() {
    let err: EditError = DiagramError::DuplicateId {
        kind: "state",
        id: 2,
    }
    .into();
    assert_eq!(err.to_string(), "Graph update failed: Duplicate state id 2");
    assert_eq!(EditError::EmptySelection.to_string(), "No transitions selected");
}

#[test]
fn test_engine_errors() {
    let err = parse_structure_output(EngineCall::Simplify, "{}").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Engine call 'simplify' returned an invalid structure"));
    assert!(err.source().is_some());
    assert!(!err.is_user_facing());

    let err = parse_photo_output("No start state").unwrap_err();
    assert!(err.is_user_facing());
    assert!(matches!(err, EngineError::Photo(PhotoError::NoStartState)));

    let err = parse_photo_output("blurry").unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidOutput {
            call: EngineCall::PhotoToAutomaton,
            ..
        }
    ));
}

#[test]
fn test_validation_messages() {
    let cases = [
        (1, "States cannot have duplicate names"),
        (2, "There must be one starting state"),
        (3, "Duplicate transitions exist"),
        (17, "Unknown error"),
    ];
    for (code, message) in cases {
        let code = ValidationCode::from_code(code);
        assert!(!code.is_valid());
        assert_eq!(WorkspaceError::Invalid(code).to_string(), format!("Cannot save structure: {}", message));
    }
    assert_eq!(ValidationCode::from_code(17).code(), 17);
}

#[test]
fn test_gallery_error_wraps_into_workspace() {
    let source = serde_json::from_str::<Vec<Structure>>("nope").unwrap_err();
    let err: WorkspaceError = GalleryError::Corrupt {
        slot: "previous-structures".to_string(),
        source,
    }
    .into();
    assert!(err
        .to_string()
        .starts_with("Gallery slot 'previous-structures' is corrupt"));
}
