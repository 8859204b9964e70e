//! automaton-canvas - lay out, draw and edit finite automata
//!
//! States are placed on a circle, transitions between the same pair of
//! states are merged into one labelled arrow, and the result is drawn either
//! as a hit-testable primitive scene or as a standalone SVG.
//!
//! # Quick Start
//!
//! ```rust
//! use automaton_canvas::{render_svg, Structure};
//!
//! let json = Structure::default_nfa().to_json().unwrap();
//! let svg = render_svg(&json).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```
//!
//! # Editing
//!
//! ```rust
//! use automaton_canvas::prelude::*;
//!
//! let graph = Structure::default_nfa().into_graph();
//! let mut editor = Editor::editing();
//!
//! editor.tap_state(&graph, 1).unwrap();
//! let outcome = editor.choose_state_action(&graph, StateAction::ToggleStart).unwrap();
//! let edited = outcome.graph.unwrap();
//!
//! assert!(edited.state(1).unwrap().is_start);
//! assert!(!graph.state(1).unwrap().is_start);
//! ```

pub mod core;
pub mod editor;
pub mod engine;
pub mod gallery;
pub mod plugins;
pub mod viewport;
pub mod workspace;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, Diagram, DiagramMetrics, Graph, LayoutAlgorithm, Point, RenderOptions,
        Renderer, Scene, State, Structure, Token, Transition, ViewportConfig,
    };
    pub use crate::editor::{ArrowAction, EditMode, Editor, Notice, PaletteState, Prompt, StateAction};
    pub use crate::plugins::nfa::{CircularLayout, NfaDiagram, NfaRenderer, SvgExporter};
    pub use crate::plugins::orchestrator::Orchestrator;
    pub use crate::viewport::{ViewTransform, ViewportController};
}

/// Export structure JSON as a standalone SVG
///
/// # Example
/// ```rust
/// use automaton_canvas::render_svg;
///
/// let json = r#"{"type":"nfa","structure":{"isDfa":false,
///     "states":[{"id":0,"name":"q0","isStart":true,"isFinal":true}],
///     "transitions":[{"id":0,"start":0,"end":0,"token":"a"}]}}"#;
/// let svg = render_svg(json).unwrap();
/// assert!(svg.contains(">q0</text>"));
/// ```
pub fn render_svg(input: &str) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().process(input)
}

/// Export structure JSON with custom drawing metrics
pub fn render_svg_with_metrics(input: &str, metrics: DiagramMetrics) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::with_metrics(metrics).process(input)
}

/// Parse structure JSON without drawing it
///
/// # Example
/// ```rust
/// use automaton_canvas::parse_structure;
///
/// let structure = parse_structure(
///     r#"{"type":"nfa","structure":{"isDfa":true,"states":[],"transitions":[]}}"#,
/// ).unwrap();
/// assert!(structure.graph().is_dfa());
/// ```
pub fn parse_structure(input: &str) -> anyhow::Result<Structure> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().parse(input)
}
