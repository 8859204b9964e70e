//! Transition arrow resolution
//!
//! Raw transitions are merged into visual arrows: every transition sharing an
//! ordered `(from, to)` pair collapses into one arrow whose label joins the
//! tokens with commas. Each arrow then gets its route geometry and the anchor
//! for its label.
//!
//! Routes come in two shapes:
//!
//! - self-loops are flattened elliptical arcs leaving and re-entering the
//!   state on the side facing away from the diagram origin,
//! - everything else is a straight segment trimmed to the state circles,
//!   split sideways when the reverse arrow also exists so the pair does not
//!   overlap.

use std::collections::{BTreeSet, HashMap};
use std::f64::consts::FRAC_PI_2;

use serde::Serialize;
use tracing::{debug, span, trace, Level};

use super::{Database, DiagramMetrics, Graph, LayoutResult, Point, StateId, TransitionId};

/// Geometry of one arrow
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ArrowRoute {
    /// Segment from `start` to `end`, arrowhead at `end`
    #[serde(rename_all = "camelCase")]
    Straight {
        start: Point,
        end: Point,
        /// Bearing from the source center to the target center
        bearing: f64,
        /// Whether the arrow is offset because the reverse arrow exists
        split: bool,
    },
    /// Elliptical arc from `start` to `end` around the state, arrowhead at `end`
    #[serde(rename_all = "camelCase")]
    SelfLoop {
        start: Point,
        end: Point,
        radius_x: f64,
        radius_y: f64,
        /// Ellipse rotation in degrees
        rotation: f64,
        /// Direction the loop points, in radians
        facing: f64,
    },
}

impl ArrowRoute {
    pub fn is_curve(&self) -> bool {
        matches!(self, ArrowRoute::SelfLoop { .. })
    }

    pub fn start(&self) -> Point {
        match *self {
            ArrowRoute::Straight { start, .. } | ArrowRoute::SelfLoop { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            ArrowRoute::Straight { end, .. } | ArrowRoute::SelfLoop { end, .. } => end,
        }
    }

    /// SVG path data for the route
    pub fn path_data(&self) -> String {
        use super::fmt_num as n;
        match *self {
            ArrowRoute::Straight { start, end, .. } => format!(
                "M {} {} L {} {}",
                n(start.x),
                n(start.y),
                n(end.x),
                n(end.y)
            ),
            ArrowRoute::SelfLoop {
                start,
                end,
                radius_x,
                radius_y,
                rotation,
                ..
            } => format!(
                "M {} {} A {} {} {} 1 1 {} {}",
                n(start.x),
                n(start.y),
                n(radius_x),
                n(radius_y),
                n(rotation),
                n(end.x),
                n(end.y)
            ),
        }
    }
}

/// One drawn arrow, standing for one or more transitions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionArrow {
    pub member_ids: BTreeSet<TransitionId>,
    pub from: StateId,
    pub to: StateId,
    /// Member tokens joined with `,`, in transition order
    pub label: String,
    pub route: ArrowRoute,
    pub label_anchor: Point,
}

impl TransitionArrow {
    pub fn is_curve(&self) -> bool {
        self.route.is_curve()
    }
}

/// Direction a start state's entry arrow comes from
pub fn entry_angle(position: Point) -> f64 {
    position.angle()
}

/// Merges transitions into arrows and computes their geometry
#[derive(Debug, Clone, Default)]
pub struct ArrowResolver {
    metrics: DiagramMetrics,
}

impl ArrowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: DiagramMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &DiagramMetrics {
        &self.metrics
    }

    /// Resolve every transition of `graph` into arrows, ordered by the first
    /// appearance of each `(from, to)` pair.
    pub fn resolve(&self, graph: &Graph, layout: &LayoutResult) -> Vec<TransitionArrow> {
        let resolve_span = span!(
            Level::DEBUG,
            "resolve_arrows",
            transitions = graph.edge_count()
        );
        let _enter = resolve_span.enter();

        let mut arrows: Vec<TransitionArrow> = Vec::new();
        let mut by_pair: HashMap<(StateId, StateId), usize> = HashMap::new();

        for transition in graph.edges() {
            let pair = (transition.from, transition.to);
            if let Some(&i) = by_pair.get(&pair) {
                let arrow = &mut arrows[i];
                arrow.label.push(',');
                arrow.label.push(transition.token.as_char());
                arrow.member_ids.insert(transition.id);
                trace!(transition_id = transition.id, arrow = i, "Merged into arrow");
                continue;
            }

            let route = if transition.is_self_loop() {
                let is_start = graph
                    .get_node(transition.from)
                    .map(|s| s.is_start)
                    .unwrap_or(false);
                self.self_loop(layout.position(transition.from), is_start)
            } else {
                let split = graph.has_transition(transition.to, transition.from);
                self.straight(
                    layout.position(transition.from),
                    layout.position(transition.to),
                    split,
                )
            };
            let label_anchor = self.label_anchor(&route, layout.position(transition.from));

            by_pair.insert(pair, arrows.len());
            arrows.push(TransitionArrow {
                member_ids: BTreeSet::from([transition.id]),
                from: transition.from,
                to: transition.to,
                label: transition.token.to_string(),
                route,
                label_anchor,
            });
        }

        debug!(arrows = arrows.len(), "Resolved transition arrows");
        arrows
    }

    /// Loop route for a state at `position`; start states turn the loop a
    /// quarter turn so it clears the entry arrow.
    pub fn self_loop(&self, position: Point, is_start: bool) -> ArrowRoute {
        let m = &self.metrics;
        let mut facing = position.angle();
        if is_start {
            facing += FRAC_PI_2;
        }
        ArrowRoute::SelfLoop {
            start: position.offset(facing - m.self_loop_half_angle, m.state_radius),
            end: position.offset(facing + m.self_loop_half_angle, m.state_radius),
            radius_x: m.curve_radius1,
            radius_y: m.curve_radius2,
            rotation: facing.to_degrees(),
            facing,
        }
    }

    /// Segment between two state circles
    pub fn straight(&self, from: Point, to: Point, split: bool) -> ArrowRoute {
        let m = &self.metrics;
        let bearing = from.bearing_to(to);
        let offset = if split { m.duplicate_split } else { 0.0 };
        let start = from.offset(bearing - offset, m.state_radius);
        let end = to.offset(bearing + offset, -m.state_radius);
        ArrowRoute::Straight {
            start,
            end,
            bearing,
            split,
        }
    }

    /// Where the label of an arrow goes. `origin` is the source state's center.
    pub fn label_anchor(&self, route: &ArrowRoute, origin: Point) -> Point {
        let m = &self.metrics;
        match *route {
            ArrowRoute::Straight { end, bearing, .. } => end
                .offset(bearing, -m.label_back)
                .offset(bearing - FRAC_PI_2, m.label_side),
            ArrowRoute::SelfLoop { facing, .. } => origin
                .offset(facing, m.state_radius + m.curve_radius1 - m.curve_label_inset)
                .offset(facing + FRAC_PI_2, m.curve_radius2 + m.curve_label_side),
        }
    }
}
