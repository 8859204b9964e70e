//! Structure JSON wire format

use automaton_canvas::core::{DiagramError, Graph, State, Structure, StructureKind, Transition};
use automaton_canvas::parse_structure;
use serde_json::{json, Value};

fn tiny() -> Structure {
    Structure::Nfa(
        Graph::new(
            true,
            vec![State::new(0, "q0").start(), State::new(1, "q1").accepting()],
            vec![Transition::new(0, 0, 1, 'a')],
        )
        .unwrap(),
    )
}

#[test]
fn test_wire_format() {
    let value: Value = serde_json::from_str(&tiny().to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "nfa",
            "structure": {
                "isDfa": true,
                "states": [
                    {"id": 0, "name": "q0", "isStart": true, "isFinal": false},
                    {"id": 1, "name": "q1", "isStart": false, "isFinal": true}
                ],
                "transitions": [
                    {"id": 0, "start": 0, "end": 1, "token": "a"}
                ]
            }
        })
    );
}

#[test]
fn test_json_round_trip_is_lossless() {
    for sample in Structure::samples() {
        let pretty = sample.to_json_pretty().unwrap();
        assert_eq!(Structure::from_json(&pretty).unwrap(), sample);
    }
}

#[test]
fn test_from_to_aliases_accepted() {
    let input = r#"{"type":"nfa","structure":{"isDfa":false,
        "states":[{"id":0,"name":"a"},{"id":1,"name":"b"}],
        "transitions":[{"id":3,"from":0,"to":1,"token":"ε"}]}}"#;
    let structure = Structure::from_json(input).unwrap();
    let t = structure.graph().transition(3).unwrap();
    assert_eq!((t.from, t.to), (0, 1));
    assert!(t.token.is_epsilon());
    // written back with the canonical names
    let out = structure.to_json().unwrap();
    assert!(out.contains(r#""start":0"#));
    assert!(!out.contains(r#""from""#));
}

#[test]
fn test_legacy_coordinates_ignored() {
    let input = r#"{"type":"nfa","structure":{"isDfa":false,
        "states":[{"id":0,"name":"a","isStart":true,"isFinal":false,"locX":120.5,"locY":-4}],
        "transitions":[]}}"#;
    let structure = Structure::from_json(input).unwrap();
    assert_eq!(structure.graph().states()[0], State::new(0, "a").start());
    assert!(!structure.to_json().unwrap().contains("locX"));
}

#[test]
fn test_missing_flags_default_to_false() {
    let input = r#"{"type":"nfa","structure":{"states":[{"id":4,"name":"x"}]}}"#;
    let structure = Structure::from_json(input).unwrap();
    let graph = structure.graph();
    assert!(!graph.is_dfa());
    assert!(graph.transitions().is_empty());
    let state = graph.state(4).unwrap();
    assert!(!state.is_start && !state.is_final);
}

#[test]
fn test_unknown_type_rejected() {
    let err = Structure::from_json(r#"{"type":"pda","structure":{}}"#).unwrap_err();
    assert!(matches!(err, DiagramError::UnknownStructureKind { ref kind } if kind == "pda"));
    assert_eq!("NFA".parse::<StructureKind>().unwrap(), StructureKind::Nfa);
    assert!("turing".parse::<StructureKind>().is_err());
}

#[test]
fn test_dangling_transition_rejected() {
    let input = r#"{"type":"nfa","structure":{"isDfa":false,
        "states":[{"id":0,"name":"a"}],
        "transitions":[{"id":0,"start":0,"end":7,"token":"a"}]}}"#;
    let err = Structure::from_json(input).unwrap_err();
    assert!(err.to_string().contains("Unknown state 7"), "{}", err);
}

#[test]
fn test_duplicate_ids_rejected() {
    let input = r#"{"type":"nfa","structure":{"isDfa":false,
        "states":[{"id":0,"name":"a"},{"id":0,"name":"b"}],"transitions":[]}}"#;
    let err = Structure::from_json(input).unwrap_err();
    assert!(err.to_string().contains("Duplicate state id 0"), "{}", err);
}

#[test]
fn test_multi_character_token_rejected() {
    let input = r#"{"type":"nfa","structure":{"isDfa":false,
        "states":[{"id":0,"name":"a"}],
        "transitions":[{"id":0,"start":0,"end":0,"token":"ab"}]}}"#;
    assert!(Structure::from_json(input).is_err());
}

#[test]
fn test_parse_structure_adds_context() {
    let err = parse_structure("[]").unwrap_err();
    assert_eq!(err.to_string(), "Failed to parse structure JSON");
    assert!(err.chain().count() >= 2);
}

#[test]
fn test_samples() {
    let samples = Structure::samples();
    assert_eq!(samples.len(), 2);
    assert!(!samples[0].graph().is_dfa());
    assert!(samples[1].graph().is_dfa());
    assert_eq!(samples[1].graph().states().len(), 7);
    assert_eq!(Structure::default(), samples[0]);
}
