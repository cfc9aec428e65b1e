//! Real-valued points in diagram plane coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used for coincidence and axis-alignment checks.
pub const EPSILON: f64 = 1e-6;

/// A point in the diagram plane.
///
/// Coordinates grow right (`x`) and down (`y`), matching the rendering surface.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns `true` if both coordinates are within [`EPSILON`] of `other`.
    pub fn is_close(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Vector from `self` to `other` as `(dx, dy)`.
    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_pythagorean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn close_within_epsilon() {
        let a = Point::new(10.0, 10.0);
        assert!(a.is_close(Point::new(10.0 + EPSILON / 2.0, 10.0)));
        assert!(!a.is_close(Point::new(10.1, 10.0)));
    }

    #[test]
    fn offset_and_delta() {
        let a = Point::new(1.0, 2.0);
        let b = a.offset(4.0, -2.0);
        assert_eq!(b, Point::new(5.0, 0.0));
        assert_eq!(a.delta_to(b), (4.0, -2.0));
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Point::new(1.5, -2.0)), "(1.5, -2)");
    }

    #[test]
    fn serde_roundtrip() {
        let p = Point::new(12.5, -3.0);
        let json = serde_json::to_string(&p).unwrap();
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
