//! Pan and zoom over the diagram
//!
//! [`ViewportController`] turns touch gestures into a [`ViewTransform`].
//! During a gesture the live transform changes every frame while the
//! [`GestureSession`] keeps the values it started from; [`ViewportController::on_release`]
//! makes the live values the new baseline.
//!
//! Larger scales show more of the diagram. Translation is in diagram units
//! and moves the centre of the visible window.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Point, ViewportConfig};

/// Current scale and translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ViewTransform {
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    pub fn translate(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    /// Visible rectangle `[min_x, min_y, width, height]` for a container of
    /// `width` by `height`. `None` when the container has no area.
    pub fn view_box(&self, width: f64, height: f64) -> Option<[f64; 4]> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let s = self.scale;
        Some([
            -(s * width) / 2.0 + self.translate_x * s,
            -(s * height) / 2.0 + self.translate_y * s,
            s * width,
            s * height,
        ])
    }
}

/// Baseline values of the gesture in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub committed_scale: f64,
    pub committed_translate: Point,
    /// Distance between the two touches on the first two-touch frame
    pub initial_pinch_distance: Option<f64>,
}

impl GestureSession {
    fn from_transform(transform: &ViewTransform) -> Self {
        Self {
            committed_scale: transform.scale,
            committed_translate: transform.translate(),
            initial_pinch_distance: None,
        }
    }
}

/// Scale after a pinch from `d0` to `d1`
///
/// Pinching inward (`d1 < d0`) zooms out, which raises the scale.
pub fn pinch_scale(committed: f64, d0: f64, d1: f64, config: &ViewportConfig) -> f64 {
    committed * config.pinch_base.powf((d0 - d1) / config.pinch_divisor)
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    transform: ViewTransform,
    session: GestureSession,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    /// Controller for the main view
    pub fn new(config: ViewportConfig) -> Self {
        Self::with_scale(config, config.initial_scale)
    }

    /// Controller for a gallery thumbnail
    pub fn thumbnail(config: ViewportConfig) -> Self {
        Self::with_scale(config, config.gallery_scale)
    }

    fn with_scale(config: ViewportConfig, scale: f64) -> Self {
        let transform = ViewTransform::new(scale);
        Self {
            config,
            transform,
            session: GestureSession::from_transform(&transform),
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// One gesture frame
    ///
    /// `touches` are the active touch points in screen units and `delta` is
    /// the accumulated movement since the gesture began. Frames with other
    /// than one or two touches are ignored.
    pub fn on_move(&mut self, touches: &[Point], delta: Point) {
        match touches {
            [_] => {
                self.session.initial_pinch_distance = None;
                self.session.committed_scale = self.transform.scale;
                self.pan(delta);
            }
            [a, b] => {
                let distance = a.distance(*b);
                let d0 = *self
                    .session
                    .initial_pinch_distance
                    .get_or_insert(distance);
                self.transform.scale =
                    pinch_scale(self.session.committed_scale, d0, distance, &self.config);
                self.pan(delta);
                trace!(d0, d1 = distance, scale = self.transform.scale, "Pinch frame");
            }
            _ => {
                trace!(touches = touches.len(), "Ignoring gesture frame");
            }
        }
    }

    fn pan(&mut self, delta: Point) {
        let translate = self.session.committed_translate - delta;
        self.transform.translate_x = translate.x;
        self.transform.translate_y = translate.y;
    }

    /// End of a gesture: the live transform becomes the baseline
    pub fn on_release(&mut self) {
        self.session = GestureSession::from_transform(&self.transform);
        debug!(
            scale = self.transform.scale,
            translate_x = self.transform.translate_x,
            translate_y = self.transform.translate_y,
            "Committed view transform"
        );
    }

    /// Back to the initial transform
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn view_box(&self, width: f64, height: f64) -> Option<[f64; 4]> {
        self.transform.view_box(width, height)
    }

    /// Map a point in container coordinates (origin top-left) into diagram
    /// coordinates
    pub fn screen_to_diagram(&self, point: Point, width: f64, height: f64) -> Option<Point> {
        let [min_x, min_y, _, _] = self.view_box(width, height)?;
        let s = self.transform.scale;
        Some(Point::new(min_x + point.x * s, min_y + point.y * s))
    }
}
