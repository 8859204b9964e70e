//! NFA/DFA diagram plugin
//!
//! Draws finite automata: states on a circle, transitions merged per
//! `(from, to)` pair into straight arrows or self-loop arcs.

mod layout;
mod renderer;

pub use layout::CircularLayout;
pub use renderer::{diagram_bounds, NfaRenderer, SvgExporter};

use anyhow::Result;

use crate::core::{
    ArrowResolver, Diagram, DiagramMetrics, Graph, LayoutResult, RenderOptions, Renderer as _,
    Scene, TransitionArrow,
};

/// Finite automaton diagram implementation
#[derive(Debug, Clone, Default)]
pub struct NfaDiagram {
    metrics: DiagramMetrics,
}

impl NfaDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: DiagramMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &DiagramMetrics {
        &self.metrics
    }
}

impl Diagram for NfaDiagram {
    type Model = Graph;

    fn name(&self) -> &'static str {
        "nfa"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn layout(&self, model: &Graph) -> Result<LayoutResult> {
        Ok(CircularLayout::with_metrics(self.metrics).place(model))
    }

    fn resolve_arrows(&self, model: &Graph, layout: &LayoutResult) -> Vec<TransitionArrow> {
        ArrowResolver::with_metrics(self.metrics).resolve(model, layout)
    }

    fn render(&self, model: &Graph, options: &RenderOptions) -> Result<Scene> {
        NfaRenderer::with_options(options.clone())
            .with_metrics(self.metrics)
            .render(model)
    }

    fn export(&self, model: &Graph) -> Result<String> {
        SvgExporter::with_metrics(self.metrics).render(model)
    }
}
