//! Plane geometry in diagram coordinates

use serde::{Deserialize, Serialize};

/// A point (or vector) in diagram space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians
    pub fn unit(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// This point moved `distance` along `angle`
    pub fn offset(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + distance * angle.cos(),
            y: self.y + distance * angle.sin(),
        }
    }

    /// `atan2(y, x)` of this point taken as a vector from the origin
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Bearing from `self` towards `other`
    pub fn bearing_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Distance from `self` to the segment `a`–`b`
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned box, grown incrementally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::at(Point::ORIGIN)
    }
}

impl BoundingBox {
    /// Zero-size box at `p`
    pub fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn include_circle(&mut self, center: Point, radius: f64) {
        self.include_point(Point::new(center.x - radius, center.y - radius));
        self.include_point(Point::new(center.x + radius, center.y + radius));
    }

    /// Grow by `margin` on every side
    pub fn expand(mut self, margin: f64) -> Self {
        self.min_x -= margin;
        self.min_y -= margin;
        self.max_x += margin;
        self.max_y += margin;
        self
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `min-x min-y width height`, as used by an SVG `viewBox`
    pub fn view_box(&self) -> String {
        format!(
            "{} {} {} {}",
            fmt_num(self.min_x),
            fmt_num(self.min_y),
            fmt_num(self.width()),
            fmt_num(self.height())
        )
    }
}

/// Format a coordinate for SVG output: at most three decimals, no trailing zeros
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_offset_and_angle() {
        let p = Point::ORIGIN.offset(PI / 2.0, 10.0);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, 10.0));
        assert!(close(p.angle(), PI / 2.0));
    }

    #[test]
    fn test_bearing() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(1.0, 5.0);
        assert!(close(a.bearing_to(b), PI / 2.0));
        assert!(close(a.distance(b), 4.0));
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(close(Point::new(5.0, 3.0).distance_to_segment(a, b), 3.0));
        assert!(close(Point::new(-4.0, 3.0).distance_to_segment(a, b), 5.0));
        assert!(close(Point::new(2.0, 2.0).distance_to_segment(a, a), 8f64.sqrt()));
    }

    #[test]
    fn test_bounding_box() {
        let mut bbox = BoundingBox::at(Point::new(10.0, 10.0));
        bbox.include_circle(Point::new(10.0, 10.0), 5.0);
        bbox.include_point(Point::new(-3.0, 20.0));
        let bbox = bbox.expand(1.0);
        assert_eq!(bbox.min_x, -4.0);
        assert_eq!(bbox.min_y, 4.0);
        assert_eq!(bbox.max_x, 16.0);
        assert_eq!(bbox.max_y, 21.0);
        assert_eq!(bbox.view_box(), "-4 4 20 17");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.23456), "1.235");
    }
}
