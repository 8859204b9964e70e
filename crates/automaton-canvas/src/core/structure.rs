//! Tagged automaton structures and their JSON wire format
//!
//! A [`Structure`] is what gets saved, exchanged with the engine, and shown
//! in the gallery:
//!
//! ```json
//! {"type":"nfa","structure":{"isDfa":false,"states":[...],"transitions":[...]}}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DiagramError, Graph, State, Transition};

/// Kinds of automaton a structure can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Nfa,
}

impl StructureKind {
    pub fn variants() -> &'static [&'static str] {
        &["nfa"]
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureKind::Nfa => write!(f, "nfa"),
        }
    }
}

impl FromStr for StructureKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nfa" => Ok(StructureKind::Nfa),
            _ => Err(DiagramError::UnknownStructureKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// An automaton tagged with its kind
///
/// DFAs are NFAs with `isDfa` set, so both live in the `Nfa` variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "structure", rename_all = "lowercase")]
pub enum Structure {
    Nfa(Graph),
}

impl Structure {
    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::Nfa(_) => StructureKind::Nfa,
        }
    }

    pub fn graph(&self) -> &Graph {
        match self {
            Structure::Nfa(graph) => graph,
        }
    }

    pub fn into_graph(self) -> Graph {
        match self {
            Structure::Nfa(graph) => graph,
        }
    }

    /// A structure of the same kind holding `graph`
    pub fn with_graph(&self, graph: Graph) -> Structure {
        match self {
            Structure::Nfa(_) => Structure::Nfa(graph),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        let structure: Structure = serde_json::from_str(json)?;
        debug!(
            kind = %structure.kind(),
            states = structure.graph().states().len(),
            transitions = structure.graph().transitions().len(),
            "Parsed structure"
        );
        Ok(structure)
    }

    pub fn to_json(&self) -> Result<String, DiagramError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DiagramError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The built-in NFA: four states with ε-moves
    pub fn default_nfa() -> Structure {
        let states = vec![
            State::new(0, "a").start(),
            State::new(1, "b"),
            State::new(2, "c"),
            State::new(3, "d").accepting(),
        ];
        Structure::Nfa(sample_graph(
            false,
            states,
            &[
                (0, 1, '1'),
                (0, 2, 'ε'),
                (0, 3, '1'),
                (1, 3, '0'),
                (1, 3, '1'),
                (2, 3, 'ε'),
                (3, 3, '0'),
            ],
        ))
    }

    /// The built-in DFA over `{0, 1}` with seven states
    pub fn default_dfa() -> Structure {
        let states = vec![
            State::new(0, "q0").start(),
            State::new(1, "q1").accepting(),
            State::new(2, "q2").accepting(),
            State::new(3, "q3"),
            State::new(4, "q4").accepting(),
            State::new(5, "q5"),
            State::new(6, "q6"),
        ];
        Structure::Nfa(sample_graph(
            true,
            states,
            &[
                (0, 3, '0'),
                (0, 1, '1'),
                (1, 2, '0'),
                (1, 5, '1'),
                (2, 2, '0'),
                (2, 5, '1'),
                (3, 0, '0'),
                (3, 4, '1'),
                (4, 2, '0'),
                (4, 5, '1'),
                (5, 5, '0'),
                (5, 5, '1'),
                (6, 6, '0'),
                (6, 6, '1'),
            ],
        ))
    }

    /// Built-in sample structures
    pub fn samples() -> Vec<Structure> {
        vec![Self::default_nfa(), Self::default_dfa()]
    }
}

impl Default for Structure {
    fn default() -> Self {
        Self::default_nfa()
    }
}

fn sample_graph(is_dfa: bool, states: Vec<State>, edges: &[(u32, u32, char)]) -> Graph {
    let transitions = edges
        .iter()
        .zip(0..)
        .map(|(&(from, to, token), id)| Transition::new(id, from, to, token))
        .collect();
    // Samples are built from constants whose ids are consistent by construction
    Graph::new(is_dfa, states, transitions).unwrap_or_default()
}
