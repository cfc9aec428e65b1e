//! Routed paths: ordered routing points from a start terminal to an end terminal.

use serde::{Deserialize, Serialize};
use sld_geom::{turn_angle, Point};

/// What a routing point marks along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointRole {
    /// First point, at the source terminal.
    Start,
    /// Last point, at the target terminal.
    End,
    /// Free intermediate point.
    Waypoint,
    /// Intermediate point where the path turns.
    Corner,
    /// Point shared with another wire.
    Junction,
}

/// A plane point tagged with its role in a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingPoint {
    /// Location.
    pub point: Point,
    /// Role tag.
    pub role: PointRole,
}

impl RoutingPoint {
    /// Creates a routing point.
    pub fn new(point: Point, role: PointRole) -> Self {
        Self { point, role }
    }

    /// A `Start`-tagged point.
    pub fn start(point: Point) -> Self {
        Self::new(point, PointRole::Start)
    }

    /// An `End`-tagged point.
    pub fn end(point: Point) -> Self {
        Self::new(point, PointRole::End)
    }

    /// A `Waypoint`-tagged point.
    pub fn waypoint(point: Point) -> Self {
        Self::new(point, PointRole::Waypoint)
    }

    /// A `Corner`-tagged point.
    pub fn corner(point: Point) -> Self {
        Self::new(point, PointRole::Corner)
    }
}

/// The bare coordinates of a path.
pub fn points(path: &[RoutingPoint]) -> Vec<Point> {
    path.iter().map(|rp| rp.point).collect()
}

/// Consecutive point pairs of a path.
pub fn segments(path: &[RoutingPoint]) -> impl Iterator<Item = (Point, Point)> + '_ {
    path.windows(2).map(|w| (w[0].point, w[1].point))
}

/// Total Euclidean length.
pub fn length(path: &[RoutingPoint]) -> f64 {
    segments(path).map(|(a, b)| a.distance(b)).sum()
}

/// Turn angle at every interior point, in path order.
pub fn turn_angles(path: &[RoutingPoint]) -> Vec<f64> {
    path.windows(3)
        .map(|w| turn_angle(w[0].point, w[1].point, w[2].point))
        .collect()
}

/// Removes interior points that coincide with their predecessor.
///
/// Endpoints are kept even when they coincide, so a degenerate connection
/// still yields the two-point path `[start, end]`. An interior point that
/// lands on the end point is dropped.
pub fn dedup(path: &[RoutingPoint]) -> Vec<RoutingPoint> {
    let Some((last, body)) = path.split_last() else {
        return Vec::new();
    };
    if body.is_empty() {
        return vec![*last];
    }

    let mut out: Vec<RoutingPoint> = Vec::with_capacity(path.len());
    out.push(body[0]);
    for rp in &body[1..] {
        if !rp.point.is_close(out[out.len() - 1].point) {
            out.push(*rp);
        }
    }
    while out.len() > 1 && out[out.len() - 1].point.is_close(last.point) {
        out.pop();
    }
    out.push(*last);
    out
}
