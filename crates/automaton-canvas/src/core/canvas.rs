//! Scene of drawing primitives shared by the live view and the SVG exporter
//!
//! A [`Scene`] is an ordered list of primitives in diagram coordinates plus
//! the frame it should be shown in. Hosts that draw live walk the primitive
//! list and use [`Scene::hit_test`] to map taps back to states and arrows;
//! exporting writes the very same list as SVG, so both views agree on every
//! coordinate.

use std::collections::BTreeSet;
use std::f64::consts::TAU;
use std::fmt;

use serde::Serialize;

use super::{
    escape_xml, fmt_num as n, label_extent, ArrowRoute, BoundingBox, Point, StateId, Stroke,
    TransitionId,
};

const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont";
const ARC_SAMPLES: usize = 48;

/// What a tap on a primitive selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "ids", rename_all = "lowercase")]
pub enum HitTarget {
    State(StateId),
    Arrow(BTreeSet<TransitionId>),
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Primitive {
    /// Filled circles are state bodies, unfilled ones are final-state rings
    Circle {
        center: Point,
        radius: f64,
        stroke: Stroke,
        filled: bool,
        hit: Option<HitTarget>,
    },
    /// A start state's entry arrow
    Line {
        start: Point,
        end: Point,
        stroke: Stroke,
        hit: Option<HitTarget>,
    },
    /// A transition arrow
    Arrow {
        route: ArrowRoute,
        stroke: Stroke,
        hit: Option<HitTarget>,
    },
    /// Centered text: a state name or an arrow label
    Text {
        position: Point,
        content: String,
        fill: Stroke,
        hit: Option<HitTarget>,
    },
}

impl Primitive {
    pub fn hit_target(&self) -> Option<&HitTarget> {
        match self {
            Primitive::Circle { hit, .. }
            | Primitive::Line { hit, .. }
            | Primitive::Arrow { hit, .. }
            | Primitive::Text { hit, .. } => hit.as_ref(),
        }
    }

    /// Whether `point` falls on this primitive, within `tolerance`
    fn contains(&self, point: Point, tolerance: f64, font_size: f64) -> bool {
        match self {
            Primitive::Circle { center, radius, .. } => point.distance(*center) <= radius + tolerance,
            Primitive::Line { start, end, .. } => point.distance_to_segment(*start, *end) <= tolerance,
            Primitive::Arrow { route, .. } => match route {
                ArrowRoute::Straight { start, end, .. } => {
                    point.distance_to_segment(*start, *end) <= tolerance
                }
                ArrowRoute::SelfLoop { .. } => sample_arc(route)
                    .windows(2)
                    .any(|w| point.distance_to_segment(w[0], w[1]) <= tolerance),
            },
            Primitive::Text {
                position, content, ..
            } => {
                let (w, h) = label_extent(content, font_size);
                (point.x - position.x).abs() <= w / 2.0 + tolerance
                    && (point.y - position.y).abs() <= h / 2.0 + tolerance
            }
        }
    }

    fn write_svg(&self, out: &mut impl fmt::Write, font_size: f64) -> fmt::Result {
        match self {
            Primitive::Circle {
                center,
                radius,
                stroke,
                filled,
                ..
            } => writeln!(
                out,
                r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="1" />"#,
                n(center.x),
                n(center.y),
                n(*radius),
                if *filled { "white" } else { "transparent" },
                stroke
            ),
            Primitive::Line {
                start, end, stroke, ..
            } => writeln!(
                out,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1" marker-end="url(#{})" />"#,
                n(start.x),
                n(start.y),
                n(end.x),
                n(end.y),
                stroke,
                stroke.marker_id()
            ),
            Primitive::Arrow { route, stroke, .. } => match route {
                ArrowRoute::Straight { start, end, .. } => writeln!(
                    out,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1" marker-end="url(#{})" />"#,
                    n(start.x),
                    n(start.y),
                    n(end.x),
                    n(end.y),
                    stroke,
                    stroke.marker_id()
                ),
                ArrowRoute::SelfLoop { .. } => writeln!(
                    out,
                    r#"  <path d="{}" stroke="{}" stroke-width="1" marker-end="url(#{})" fill="transparent" />"#,
                    route.path_data(),
                    stroke,
                    stroke.marker_id()
                ),
            },
            Primitive::Text {
                position,
                content,
                fill,
                ..
            } => writeln!(
                out,
                r#"  <text x="{}" y="{}" text-anchor="middle" alignment-baseline="middle" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
                n(position.x),
                n(position.y),
                FONT_FAMILY,
                n(font_size),
                fill,
                escape_xml(content)
            ),
        }
    }

    fn marker_stroke(&self) -> Option<Stroke> {
        match self {
            Primitive::Line { stroke, .. } | Primitive::Arrow { stroke, .. } => Some(*stroke),
            _ => None,
        }
    }
}

/// Sample points along a self-loop arc, from its start to its end.
///
/// Converts the SVG endpoint arc parameterization (large-arc and sweep both
/// set) to center form and walks it.
fn sample_arc(route: &ArrowRoute) -> Vec<Point> {
    let ArrowRoute::SelfLoop {
        start,
        end,
        radius_x,
        radius_y,
        rotation,
        ..
    } = *route
    else {
        return vec![route.start(), route.end()];
    };

    let phi = rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx = (start.x - end.x) / 2.0;
    let dy = (start.y - end.y) / 2.0;
    let x1 = cos_phi * dx + sin_phi * dy;
    let y1 = -sin_phi * dx + cos_phi * dy;

    let (mut rx, mut ry) = (radius_x.abs(), radius_y.abs());
    if rx == 0.0 || ry == 0.0 {
        return vec![start, end];
    }
    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let num = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
    let den = rx * rx * y1 * y1 + ry * ry * x1 * x1;
    // large-arc == sweep, so the center takes the negative root
    let coef = if den == 0.0 {
        0.0
    } else {
        -(num / den).max(0.0).sqrt()
    };
    let cx1 = coef * rx * y1 / ry;
    let cy1 = -coef * ry * x1 / rx;
    let cx = cos_phi * cx1 - sin_phi * cy1 + (start.x + end.x) / 2.0;
    let cy = sin_phi * cx1 + cos_phi * cy1 + (start.y + end.y) / 2.0;

    let theta1 = ((y1 - cy1) / ry).atan2((x1 - cx1) / rx);
    let theta2 = ((-y1 - cy1) / ry).atan2((-x1 - cx1) / rx);
    let mut sweep = theta2 - theta1;
    if sweep < 0.0 {
        sweep += TAU;
    }

    (0..=ARC_SAMPLES)
        .map(|k| {
            let t = theta1 + sweep * k as f64 / ARC_SAMPLES as f64;
            let (sin_t, cos_t) = t.sin_cos();
            Point::new(
                cx + rx * cos_phi * cos_t - ry * sin_phi * sin_t,
                cy + rx * sin_phi * cos_t + ry * cos_phi * sin_t,
            )
        })
        .collect()
}

/// Primitives in draw order plus the frame to show them in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub bounds: BoundingBox,
    pub font_size: f64,
}

impl Scene {
    pub fn new(bounds: BoundingBox, font_size: f64) -> Self {
        Self {
            primitives: Vec::new(),
            bounds,
            font_size,
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// The topmost hit target at `point` (diagram coordinates).
    ///
    /// Later primitives are drawn over earlier ones, so they are tested first.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<&HitTarget> {
        self.primitives
            .iter()
            .rev()
            .filter(|p| p.hit_target().is_some())
            .find(|p| p.contains(point, tolerance, self.font_size))
            .and_then(Primitive::hit_target)
    }

    /// Standalone SVG document framed by `bounds`
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scene {
    /// Writes the scene as an SVG document
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
            self.bounds.view_box()
        )?;
        out.write_str("  <defs>\n")?;
        let strokes: BTreeSet<_> = std::iter::once(Stroke::Black)
            .chain(self.primitives.iter().filter_map(Primitive::marker_stroke))
            .map(|s| (s.marker_id(), s.to_string()))
            .collect();
        for (id, colour) in strokes {
            writeln!(
                out,
                r#"    <marker id="{}" refX="10" refY="5" markerWidth="10" markerHeight="10" orient="auto"><path d="M0,0 L10,5 L0,10" fill="{}" /></marker>"#,
                id, colour
            )?;
        }
        out.write_str("  </defs>\n")?;
        for primitive in &self.primitives {
            primitive.write_svg(out, self.font_size)?;
        }
        out.write_str("</svg>\n")
    }
}
