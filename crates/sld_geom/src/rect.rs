//! Axis-aligned rectangles.

use crate::point::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// Zero or negative sizes are not rejected; a zero-size rectangle degenerates
/// to a point and still participates in intersection tests.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest rectangle containing both points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Left edge coordinate.
    pub fn min_x(&self) -> f64 {
        self.x
    }

    /// Right edge coordinate.
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge coordinate.
    pub fn min_y(&self) -> f64 {
        self.y
    }

    /// Bottom edge coordinate.
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Returns this rectangle grown by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Returns `true` if the two rectangles share any area or boundary.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x() <= other.max_x()
            && self.max_x() >= other.min_x()
            && self.min_y() <= other.max_y()
            && self.max_y() >= other.min_y()
    }

    /// The four boundary edges in clockwise order starting at the top.
    pub fn edges(&self) -> [(Point, Point); 4] {
        let tl = Point::new(self.min_x(), self.min_y());
        let tr = Point::new(self.max_x(), self.min_y());
        let br = Point::new(self.max_x(), self.max_y());
        let bl = Point::new(self.min_x(), self.max_y());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}
