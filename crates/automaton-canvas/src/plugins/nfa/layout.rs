//! Circular layout for automata
//!
//! States sit evenly spaced on one circle, in state order, starting on the
//! negative x axis. A single state sits at the origin.

use std::f64::consts::{PI, TAU};

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{Database, DiagramMetrics, Graph, LayoutAlgorithm, LayoutResult, Point, PositionedState};

/// Places the states of a graph on a circle
#[derive(Debug, Clone, Default)]
pub struct CircularLayout {
    metrics: DiagramMetrics,
}

impl CircularLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: DiagramMetrics) -> Self {
        Self { metrics }
    }

    /// Radius of the layout circle for `count` states
    pub fn radius(&self, count: usize) -> f64 {
        if count <= 1 {
            return 0.0;
        }
        self.metrics.state_radius * count as f64 * self.metrics.layout_multiplier / PI
    }

    /// Position of the state at `index` out of `count`
    pub fn position(&self, index: usize, count: usize) -> Point {
        if count <= 1 {
            return Point::ORIGIN;
        }
        let radius = self.radius(count);
        let theta = index as f64 * TAU / count as f64;
        Point::new(-radius * theta.cos(), -radius * theta.sin())
    }

    /// Lay out a graph; cannot fail
    pub fn place(&self, graph: &Graph) -> LayoutResult {
        let count = graph.node_count();
        let layout_span = span!(Level::DEBUG, "circular_layout", states = count);
        let _enter = layout_span.enter();

        let states = graph
            .nodes()
            .enumerate()
            .map(|(index, state)| PositionedState {
                id: state.id,
                position: self.position(index, count),
            })
            .collect();
        let radius = self.radius(count);
        debug!(radius, "Placed states on circle");
        LayoutResult::new(radius, states)
    }
}

impl LayoutAlgorithm<Graph> for CircularLayout {
    type Output = LayoutResult;

    fn layout(&self, database: &Graph) -> Result<Self::Output> {
        Ok(self.place(database))
    }

    fn name(&self) -> &'static str {
        "circular"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
