//! Tunable drawing and viewport constants
//!
//! Both structs deserialize from partial JSON; missing fields keep their
//! defaults.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Geometry constants for layout, arrow routing and rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramMetrics {
    /// Radius of a state circle
    pub state_radius: f64,
    /// Scales the layout circle: `R = state_radius * N * multiplier / π`
    pub layout_multiplier: f64,
    /// Angular offset of each arrow of a two-way pair
    pub duplicate_split: f64,
    /// Half the angle between a self-loop's endpoints
    pub self_loop_half_angle: f64,
    /// Self-loop ellipse radius along its axis
    pub curve_radius1: f64,
    /// Self-loop ellipse radius across its axis
    pub curve_radius2: f64,
    /// Inner ring radius of a final state, relative to `state_radius`
    pub final_ring_ratio: f64,
    /// Straight label: distance back from the arrow tip
    pub label_back: f64,
    /// Straight label: sideways offset from the arrow
    pub label_side: f64,
    /// Curved label: how far the ellipse center sits inside `r + curve_radius1`
    pub curve_label_inset: f64,
    /// Curved label: extra sideways offset beyond `curve_radius2`
    pub curve_label_side: f64,
    /// Font size used for labels and for hit-test text boxes
    pub font_size: f64,
}

impl Default for DiagramMetrics {
    fn default() -> Self {
        let state_radius = 30.0;
        Self {
            state_radius,
            layout_multiplier: 2.6,
            duplicate_split: PI / 16.0,
            self_loop_half_angle: PI / 8.0,
            curve_radius1: state_radius / 1.2,
            curve_radius2: state_radius / 2.0,
            final_ring_ratio: 0.85,
            label_back: 30.0,
            label_side: 10.0,
            curve_label_inset: 9.0,
            curve_label_side: 10.0,
            font_size: 16.0,
        }
    }
}

impl DiagramMetrics {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Radius of the inner ring drawn for final states
    pub fn final_ring_radius(&self) -> f64 {
        self.state_radius * self.final_ring_ratio
    }

    /// Distance from a start state's center to the tail of its entry arrow
    pub fn entry_tail(&self) -> f64 {
        2.0 * self.state_radius
    }

    /// Margin added around the drawn content when exporting
    pub fn export_margin(&self) -> f64 {
        2.0 * self.curve_radius1
    }
}

/// Viewport constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub initial_scale: f64,
    /// Scale factor base for pinch: `scale = committed * base^((d0 - d1) / divisor)`
    pub pinch_base: f64,
    pub pinch_divisor: f64,
    /// Initial scale of gallery thumbnails
    pub gallery_scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_scale: 1.3,
            pinch_base: 1.6,
            pinch_divisor: 100.0,
            gallery_scale: 5.0,
        }
    }
}

impl ViewportConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
