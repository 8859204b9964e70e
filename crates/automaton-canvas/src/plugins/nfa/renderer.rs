//! Scene construction and SVG export for automata
//!
//! [`NfaRenderer`] builds the primitive [`Scene`] for the live view;
//! [`SvgExporter`] writes the same scene, unstyled, as a standalone SVG.

use anyhow::Result;
use tracing::{debug, info, span, Level};

use super::layout::CircularLayout;
use crate::core::{
    entry_angle, ArrowResolver, BoundingBox, DiagramMetrics, Graph, HitTarget, LayoutResult,
    Primitive, RenderOptions, Renderer, Scene, Stroke, TransitionArrow,
};

/// Frame of the drawing: every state circle and entry arrow tail, with room
/// for self-loops on every side.
pub fn diagram_bounds(graph: &Graph, layout: &LayoutResult, metrics: &DiagramMetrics) -> BoundingBox {
    let mut states = graph.states().iter();
    let Some(first) = states.next() else {
        return BoundingBox::default().expand(metrics.export_margin());
    };

    let mut bounds = BoundingBox::at(layout.position(first.id));
    for state in std::iter::once(first).chain(states) {
        let position = layout.position(state.id);
        bounds.include_circle(position, metrics.state_radius);
        if state.is_start {
            bounds.include_point(position.offset(entry_angle(position), metrics.entry_tail()));
        }
    }
    bounds.expand(metrics.export_margin())
}

/// Builds scenes for the interactive view
#[derive(Debug, Clone, Default)]
pub struct NfaRenderer {
    metrics: DiagramMetrics,
    options: RenderOptions,
}

impl NfaRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            metrics: DiagramMetrics::default(),
            options,
        }
    }

    pub fn with_metrics(mut self, metrics: DiagramMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Lay out, resolve and draw `graph`
    pub fn build_scene(&self, graph: &Graph) -> Scene {
        let render_span = span!(
            Level::DEBUG,
            "build_scene",
            states = graph.states().len(),
            transitions = graph.transitions().len(),
            editable = self.options.editable
        );
        let _enter = render_span.enter();

        let layout = CircularLayout::with_metrics(self.metrics).place(graph);
        let arrows = ArrowResolver::with_metrics(self.metrics).resolve(graph, &layout);
        self.scene_from_parts(graph, &layout, &arrows)
    }

    /// Draw an already laid-out graph
    pub fn scene_from_parts(
        &self,
        graph: &Graph,
        layout: &LayoutResult,
        arrows: &[TransitionArrow],
    ) -> Scene {
        let m = &self.metrics;
        let editable = self.options.editable;
        let mut scene = Scene::new(diagram_bounds(graph, layout, m), m.font_size);

        for state in graph.states() {
            let position = layout.position(state.id);
            let stroke = self.options.state_stroke(state.id);
            let hit = editable.then_some(HitTarget::State(state.id));

            scene.push(Primitive::Circle {
                center: position,
                radius: m.state_radius,
                stroke,
                filled: true,
                hit: hit.clone(),
            });
            scene.push(Primitive::Text {
                position,
                content: state.name.clone(),
                fill: Stroke::Black,
                hit,
            });
            if state.is_final {
                scene.push(Primitive::Circle {
                    center: position,
                    radius: m.final_ring_radius(),
                    stroke,
                    filled: false,
                    hit: None,
                });
            }
            if state.is_start {
                let angle = entry_angle(position);
                scene.push(Primitive::Line {
                    start: position.offset(angle, m.entry_tail()),
                    end: position.offset(angle, m.state_radius),
                    stroke: Stroke::Black,
                    hit: None,
                });
            }
        }

        for arrow in arrows {
            scene.push(Primitive::Arrow {
                route: arrow.route,
                stroke: self.options.arrow_stroke(&arrow.member_ids),
                hit: editable.then(|| HitTarget::Arrow(arrow.member_ids.clone())),
            });
        }
        // labels go last so they sit above every arrow
        for arrow in arrows {
            scene.push(Primitive::Text {
                position: arrow.label_anchor,
                content: arrow.label.clone(),
                fill: self.options.arrow_stroke(&arrow.member_ids),
                hit: editable.then(|| HitTarget::Arrow(arrow.member_ids.clone())),
            });
        }

        debug!(primitives = scene.len(), "Built scene");
        scene
    }
}

impl Renderer<Graph> for NfaRenderer {
    type Output = Scene;

    fn render(&self, database: &Graph) -> Result<Self::Output> {
        Ok(self.build_scene(database))
    }

    fn name(&self) -> &'static str {
        "scene"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "primitives"
    }
}

/// Writes a graph as a standalone SVG document
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    metrics: DiagramMetrics,
}

impl SvgExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: DiagramMetrics) -> Self {
        Self { metrics }
    }

    pub fn export(&self, graph: &Graph) -> String {
        let export_span = span!(Level::INFO, "export_svg", states = graph.states().len());
        let _enter = export_span.enter();

        let scene = NfaRenderer::new().with_metrics(self.metrics).build_scene(graph);
        let svg = scene.to_svg();
        info!(
            width = scene.bounds.width(),
            height = scene.bounds.height(),
            bytes = svg.len(),
            "Exported SVG"
        );
        svg
    }
}

impl Renderer<Graph> for SvgExporter {
    type Output = String;

    fn render(&self, database: &Graph) -> Result<Self::Output> {
        Ok(self.export(database))
    }

    fn name(&self) -> &'static str {
        "svg"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "svg"
    }
}
