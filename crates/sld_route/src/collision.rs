//! Collision detection between routed paths, obstacles, and other wires.
//!
//! Collisions never block routing. They are collected as [`CollisionRecord`]s
//! against the finished path so the caller can decide what to do with them.

use crate::obstacles::Obstacle;
use crate::path::{segments, RoutingPoint};
use serde::{Deserialize, Serialize};
use sld_diagnostics::Severity;
use sld_geom::{
    collinear_overlap, segment_intersection, segment_intersects_rect, segment_rect_entry, Point,
    EPSILON,
};
use std::fmt;

/// What a path collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionKind {
    /// Passes through a foreign component's padded body.
    ComponentOverlap,
    /// Crosses another wire routed in the same batch.
    WireCrossing,
    /// Runs closer to a foreign component than its voltage class allows.
    ClearanceViolation,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionKind::ComponentOverlap => "component-overlap",
            CollisionKind::WireCrossing => "wire-crossing",
            CollisionKind::ClearanceViolation => "clearance-violation",
        })
    }
}

/// One advisory collision found on a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// Where the path first meets the obstacle or wire.
    pub point: Point,
    /// Warning, error, or critical.
    pub severity: Severity,
    /// Collision kind.
    pub kind: CollisionKind,
    /// Human-readable description.
    pub description: String,
    /// The component or connection collided with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

/// A wire already routed in the current batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedWire {
    /// Connection id.
    pub connection: String,
    /// Final path coordinates.
    pub points: Vec<Point>,
}

fn is_excluded(obstacle: &Obstacle, exclude: &[&str]) -> bool {
    exclude.contains(&obstacle.component.as_str())
}

/// Returns `true` if the segment crosses any obstacle not owned by an excluded component.
///
/// The result does not depend on segment direction.
pub fn segment_collides(p1: Point, p2: Point, obstacles: &[Obstacle], exclude: &[&str]) -> bool {
    obstacles
        .iter()
        .filter(|o| !is_excluded(o, exclude))
        .any(|o| segment_intersects_rect(p1, p2, &o.rect))
}

/// Number of path segments that cross a non-excluded obstacle.
pub fn colliding_segment_count(path: &[RoutingPoint], obstacles: &[Obstacle], exclude: &[&str]) -> usize {
    segments(path)
        .filter(|&(a, b)| segment_collides(a, b, obstacles, exclude))
        .count()
}

/// Component-overlap records for every (segment, obstacle) crossing.
///
/// Severity is critical for obstacles whose priority exceeds the critical
/// threshold, warning otherwise.
pub fn path_collisions(
    path: &[RoutingPoint],
    obstacles: &[Obstacle],
    exclude: &[&str],
) -> Vec<CollisionRecord> {
    let mut records = Vec::new();
    for (a, b) in segments(path) {
        for obstacle in obstacles.iter().filter(|o| !is_excluded(o, exclude)) {
            if let Some(point) = segment_rect_entry(a, b, &obstacle.rect) {
                let severity = if obstacle.is_critical() {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                records.push(CollisionRecord {
                    point,
                    severity,
                    kind: CollisionKind::ComponentOverlap,
                    description: format!(
                        "passes through component '{}' (priority {})",
                        obstacle.component, obstacle.priority
                    ),
                    other: Some(obstacle.component.clone()),
                });
            }
        }
    }
    records
}

/// Clearance records for segments that come within `spacing` of an obstacle
/// without crossing the obstacle itself.
pub fn clearance_violations(
    path: &[RoutingPoint],
    obstacles: &[Obstacle],
    exclude: &[&str],
    spacing: f64,
) -> Vec<CollisionRecord> {
    if spacing <= 0.0 {
        return Vec::new();
    }
    let mut records = Vec::new();
    for (a, b) in segments(path) {
        for obstacle in obstacles.iter().filter(|o| !is_excluded(o, exclude)) {
            if segment_intersects_rect(a, b, &obstacle.rect) {
                continue;
            }
            if let Some(point) = segment_rect_entry(a, b, &obstacle.rect.inflate(spacing)) {
                let severity = if obstacle.is_critical() {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                records.push(CollisionRecord {
                    point,
                    severity,
                    kind: CollisionKind::ClearanceViolation,
                    description: format!(
                        "within {spacing} of component '{}'",
                        obstacle.component
                    ),
                    other: Some(obstacle.component.clone()),
                });
            }
        }
    }
    records
}

/// Crossing records against wires already routed in this batch.
///
/// Touching at a shared endpoint (two wires leaving the same terminal) is
/// not a crossing.
pub fn wire_crossings(path: &[RoutingPoint], routed: &[RoutedWire]) -> Vec<CollisionRecord> {
    let ends: Vec<Point> = [path.first(), path.last()]
        .into_iter()
        .flatten()
        .map(|rp| rp.point)
        .collect();

    let mut records = Vec::new();
    for wire in routed {
        let wire_ends = [wire.points.first(), wire.points.last()];
        for (a, b) in segments(path) {
            for pair in wire.points.windows(2) {
                let Some(point) = segment_intersection(a, b, pair[0], pair[1]) else {
                    continue;
                };
                let at_shared_end = ends.iter().any(|e| e.is_close(point))
                    || wire_ends.iter().flatten().any(|e| e.is_close(point));
                if at_shared_end {
                    continue;
                }
                records.push(CollisionRecord {
                    point,
                    severity: Severity::Warning,
                    kind: CollisionKind::WireCrossing,
                    description: format!("crosses wire '{}'", wire.connection),
                    other: Some(wire.connection.clone()),
                });
            }
        }
    }
    records
}

/// Number of path segments drawn on top of a wire already routed in the batch.
///
/// Crossings are not counted here; only stretches where two wires would be
/// indistinguishable on the drawing.
pub fn shared_runs(path: &[RoutingPoint], routed: &[RoutedWire]) -> usize {
    segments(path)
        .filter(|&(a, b)| {
            routed.iter().any(|wire| {
                wire.points
                    .windows(2)
                    .any(|w| collinear_overlap(a, b, w[0], w[1]) > EPSILON)
            })
        })
        .count()
}
