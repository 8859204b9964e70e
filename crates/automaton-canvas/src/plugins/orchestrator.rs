//! Plugin orchestrator for the drawing pipeline
//!
//! The orchestrator takes a structure (or its JSON), dispatches on its kind,
//! and runs layout → arrow resolution → rendering or export through the
//! matching [`Diagram`] plugin.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, span, Level};

use crate::core::{
    Diagram, DiagramMetrics, LayoutResult, RenderOptions, Scene, Structure, TransitionArrow,
};
use crate::plugins::nfa::NfaDiagram;

/// Layout and arrows of a structure, for inspection
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub kind: String,
    pub layout: LayoutResult,
    pub arrows: Vec<TransitionArrow>,
}

/// Plugin orchestrator that coordinates the pipeline
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    nfa: NfaDiagram,
}

impl Orchestrator {
    /// Create an orchestrator with default metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator whose plugins share `metrics`
    pub fn with_metrics(metrics: DiagramMetrics) -> Self {
        Self {
            nfa: NfaDiagram::with_metrics(metrics),
        }
    }

    /// Parse structure JSON, wrapping failures with context
    pub fn parse(&self, input: &str) -> Result<Structure> {
        let parse_span = span!(Level::DEBUG, "pipeline_parse", input_len = input.len());
        let _enter = parse_span.enter();

        let structure = Structure::from_json(input).context("Failed to parse structure JSON")?;
        debug!(kind = %structure.kind(), "Parsed structure");
        Ok(structure)
    }

    /// Layout and resolved arrows of a structure
    pub fn inspect(&self, structure: &Structure) -> Result<Inspection> {
        let inspect_span = span!(Level::INFO, "inspect_structure", kind = %structure.kind());
        let _enter = inspect_span.enter();

        match structure {
            Structure::Nfa(graph) => {
                let layout = self.nfa.layout(graph)?;
                let arrows = self.nfa.resolve_arrows(graph, &layout);
                Ok(Inspection {
                    kind: structure.kind().to_string(),
                    layout,
                    arrows,
                })
            }
        }
    }

    /// Primitive scene for the live view
    pub fn render(&self, structure: &Structure, options: &RenderOptions) -> Result<Scene> {
        let render_span = span!(Level::DEBUG, "pipeline_render", kind = %structure.kind());
        let _enter = render_span.enter();

        match structure {
            Structure::Nfa(graph) => self.nfa.render(graph, options),
        }
    }

    /// Standalone SVG of a structure
    pub fn export(&self, structure: &Structure) -> Result<String> {
        let export_span = span!(Level::INFO, "pipeline_export", kind = %structure.kind());
        let _enter = export_span.enter();

        let svg = match structure {
            Structure::Nfa(graph) => self.nfa.export(graph)?,
        };
        info!(output_len = svg.len(), "Pipeline completed successfully");
        Ok(svg)
    }

    /// Parse structure JSON and export it as SVG
    pub fn process(&self, input: &str) -> Result<String> {
        let process_span = span!(Level::INFO, "process_structure", input_len = input.len());
        let _enter = process_span.enter();

        let structure = self.parse(input)?;
        self.export(&structure)
    }
}
