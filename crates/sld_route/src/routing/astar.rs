//! A* search over a routing grid.
//!
//! The plane is discretized with the constraint grid size, anchored so that
//! the start terminal sits exactly on a grid node. The grid covers the
//! start/end box plus any obstacle touching it, with a small margin. Search
//! states carry the heading they arrived with so turns can be penalized,
//! which keeps routes from staircasing. Edges are collision-checked with the
//! same detector the rest of the engine uses, against obstacles grown by the
//! wire's clearance. Edges lying on a wire already routed in the batch cost
//! extra, so parallel wires between the same pair take separate tracks.

use super::{direct, RouteRequest};
use crate::collision::segment_collides;
use crate::obstacles::Obstacle;
use crate::path::{dedup, RoutingPoint};
use sld_geom::{collinear_overlap, Point, Rect, EPSILON};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Grids larger than this fall back to Manhattan routing.
const MAX_GRID_CELLS: i64 = 40_000;

/// Extra grid cells around the search area on every side.
const MARGIN_CELLS: i64 = 3;

/// Cost of a turn, in grid steps.
const BEND_PENALTY: f64 = 0.5;

/// Extra cost of an edge drawn on top of an already routed wire, in grid steps.
const OVERLAP_PENALTY: f64 = 2.0;

const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

type Cell = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeKey {
    cell: Cell,
    /// Index into [`DIRECTIONS`] of the step that reached this cell.
    heading: Option<usize>,
}

/// A search state in the A* priority queue.
#[derive(Debug, Clone)]
struct AStarState {
    node: NodeKey,
    /// Total cost from start to this node (g-score).
    cost: f64,
    /// Estimated total cost including heuristic (f-score = g + h).
    estimated_total: f64,
}

impl PartialEq for AStarState {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_total == other.estimated_total
    }
}

impl Eq for AStarState {}

impl Ord for AStarState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default)
        other
            .estimated_total
            .partial_cmp(&self.estimated_total)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AStarState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded grid anchored at the start point.
struct Grid {
    origin: Point,
    step: f64,
    min: Cell,
    max: Cell,
}

impl Grid {
    /// Sizes the grid from the start/end box and the keep-out zones touching it.
    ///
    /// The cell span is measured in `f64` before any integer conversion, so a
    /// vanishing grid step reports "over budget" instead of overflowing.
    fn around(request: &RouteRequest<'_>, keep_out: &[Obstacle]) -> Option<Grid> {
        let step = request.constraints.grid_size;
        if !(step > 0.0) || !step.is_finite() {
            return None;
        }
        let origin = request.start;

        let span = Rect::from_corners(request.start, request.end);
        let (mut lo, mut hi) = (
            Point::new(span.min_x(), span.min_y()),
            Point::new(span.max_x(), span.max_y()),
        );
        for obstacle in keep_out {
            if obstacle.rect.overlaps(&span) {
                let r = &obstacle.rect;
                lo = Point::new(lo.x.min(r.min_x()), lo.y.min(r.min_y()));
                hi = Point::new(hi.x.max(r.max_x()), hi.y.max(r.max_y()));
            }
        }

        let margin = MARGIN_CELLS as f64;
        let min = (
            ((lo.x - origin.x) / step).floor() - margin,
            ((lo.y - origin.y) / step).floor() - margin,
        );
        let max = (
            ((hi.x - origin.x) / step).ceil() + margin,
            ((hi.y - origin.y) / step).ceil() + margin,
        );
        let cells = (max.0 - min.0 + 1.0) * (max.1 - min.1 + 1.0);
        if !cells.is_finite() || cells > MAX_GRID_CELLS as f64 {
            return None;
        }
        // Both spans are bounded by the cell budget, so the casts are exact.
        Some(Grid {
            origin,
            step,
            min: (min.0 as i64, min.1 as i64),
            max: (max.0 as i64, max.1 as i64),
        })
    }

    fn point(&self, cell: Cell) -> Point {
        Point::new(
            self.origin.x + cell.0 as f64 * self.step,
            self.origin.y + cell.1 as f64 * self.step,
        )
    }

    fn nearest(&self, p: Point) -> Cell {
        (
            (((p.x - self.origin.x) / self.step).round() as i64).clamp(self.min.0, self.max.0),
            (((p.y - self.origin.y) / self.step).round() as i64).clamp(self.min.1, self.max.1),
        )
    }

    fn contains(&self, cell: Cell) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    fn cell_count(&self) -> usize {
        ((self.max.0 - self.min.0 + 1) * (self.max.1 - self.min.1 + 1)) as usize
    }
}

/// Finds an orthogonal route around obstacles, or `None` when the grid is
/// over budget or the goal is unreachable.
pub(crate) fn astar_route(request: &RouteRequest<'_>) -> Option<Vec<RoutingPoint>> {
    if request.start.is_close(request.end) {
        return Some(direct(request.start, request.end));
    }
    let keep_out: Vec<Obstacle> = request
        .obstacles
        .iter()
        .map(|o| Obstacle {
            rect: o.rect.inflate(request.clearance),
            ..o.clone()
        })
        .collect();
    let grid = Grid::around(request, &keep_out)?;
    let goal = grid.nearest(request.end);
    let cells = search(&grid, request, &keep_out, goal)?;
    Some(to_path(&grid, &cells, request.start, request.end))
}

fn search(
    grid: &Grid,
    request: &RouteRequest<'_>,
    keep_out: &[Obstacle],
    goal: Cell,
) -> Option<Vec<Cell>> {
    let start = NodeKey {
        cell: (0, 0),
        heading: None,
    };
    let budget = grid.cell_count() * DIRECTIONS.len();

    let mut open = BinaryHeap::new();
    let mut g_scores: HashMap<NodeKey, f64> = HashMap::new();
    let mut came_from: HashMap<NodeKey, NodeKey> = HashMap::new();
    let mut blocked: HashMap<(Cell, usize), bool> = HashMap::new();
    let mut shared: HashMap<(Cell, usize), bool> = HashMap::new();
    let mut expanded = 0usize;

    g_scores.insert(start, 0.0);
    open.push(AStarState {
        node: start,
        cost: 0.0,
        estimated_total: heuristic(start.cell, goal),
    });

    while let Some(current) = open.pop() {
        if current.node.cell == goal {
            return Some(reconstruct_path(&came_from, start, current.node));
        }

        let current_g = *g_scores.get(&current.node).unwrap_or(&f64::INFINITY);
        if current.cost > current_g {
            continue; // Stale entry
        }
        expanded += 1;
        if expanded > budget {
            return None;
        }

        let here = grid.point(current.node.cell);
        for (heading, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
            let next_cell = (current.node.cell.0 + dx, current.node.cell.1 + dy);
            if !grid.contains(next_cell) {
                continue;
            }
            let there = grid.point(next_cell);
            let edge_blocked = *blocked
                .entry((current.node.cell, heading))
                .or_insert_with(|| segment_collides(here, there, keep_out, request.exclude));
            if edge_blocked {
                continue;
            }
            let on_routed = *shared
                .entry((current.node.cell, heading))
                .or_insert_with(|| runs_along_routed(here, there, request));

            let turn = match current.node.heading {
                Some(prev) if prev != heading => BEND_PENALTY,
                _ => 0.0,
            };
            let overlap = if on_routed { OVERLAP_PENALTY } else { 0.0 };
            let next = NodeKey {
                cell: next_cell,
                heading: Some(heading),
            };
            let tentative_g = current_g + 1.0 + turn + overlap;
            if tentative_g < *g_scores.get(&next).unwrap_or(&f64::INFINITY) {
                g_scores.insert(next, tentative_g);
                came_from.insert(next, current.node);
                open.push(AStarState {
                    node: next,
                    cost: tentative_g,
                    estimated_total: tentative_g + heuristic(next_cell, goal),
                });
            }
        }
    }

    None // Goal unreachable
}

/// Returns `true` if the edge `a-b` runs along a segment of an already routed wire.
fn runs_along_routed(a: Point, b: Point, request: &RouteRequest<'_>) -> bool {
    request.routed.iter().any(|wire| {
        wire.points
            .windows(2)
            .any(|w| collinear_overlap(a, b, w[0], w[1]) > EPSILON)
    })
}

/// Manhattan distance in grid steps.
fn heuristic(from: Cell, to: Cell) -> f64 {
    ((from.0 - to.0).abs() + (from.1 - to.1).abs()) as f64
}

fn reconstruct_path(
    came_from: &HashMap<NodeKey, NodeKey>,
    start: NodeKey,
    end: NodeKey,
) -> Vec<Cell> {
    let mut cells = vec![end.cell];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                cells.push(prev.cell);
                current = prev;
            }
            None => break,
        }
    }
    cells.reverse();
    cells
}

/// Converts grid cells to routing points, keeping only turns, then joins the
/// goal node to the exact end point with an orthogonal elbow.
fn to_path(grid: &Grid, cells: &[Cell], start: Point, end: Point) -> Vec<RoutingPoint> {
    let pts: Vec<Point> = cells.iter().map(|&c| grid.point(c)).collect();
    let mut out = vec![RoutingPoint::start(start)];
    for w in pts.windows(3) {
        let (ax, ay) = w[0].delta_to(w[1]);
        let (bx, by) = w[1].delta_to(w[2]);
        if (ax - bx).abs() > EPSILON || (ay - by).abs() > EPSILON {
            out.push(RoutingPoint::corner(w[1]));
        }
    }

    let goal = pts.last().copied().unwrap_or(start);
    if !goal.is_close(end) {
        out.push(RoutingPoint::corner(goal));
        out.push(RoutingPoint::corner(Point::new(end.x, goal.y)));
    }
    out.push(RoutingPoint::end(end));
    dedup(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{colliding_segment_count, RoutedWire};
    use crate::ids::ObstacleId;
    use crate::path::points;
    use sld_config::RoutingConstraints;
    use sld_geom::is_axis_aligned;

    fn blocker(component: &str, rect: Rect) -> Obstacle {
        Obstacle {
            id: ObstacleId::from_raw(0),
            component: component.into(),
            rect,
            priority: 5,
        }
    }

    #[test]
    fn open_field_is_straight() {
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &[], &constraints);
        let path = astar_route(&req).unwrap();
        assert_eq!(points(&path), vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
    }

    #[test]
    fn routes_around_obstacle() {
        let obs = vec![blocker("B", Rect::new(40.0, -30.0, 20.0, 60.0))];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &obs, &constraints);
        let path = astar_route(&req).unwrap();
        assert_eq!(colliding_segment_count(&path, &obs, &[]), 0);
        assert!(path.windows(2).all(|w| is_axis_aligned(w[0].point, w[1].point)));
        assert_eq!(path[0].point, Point::new(0.0, 0.0));
        assert_eq!(path[path.len() - 1].point, Point::new(100.0, 0.0));
    }

    #[test]
    fn off_grid_end_gets_elbow() {
        let constraints = RoutingConstraints::default();
        let end = Point::new(105.0, 7.0);
        let req = RouteRequest::new(Point::new(0.0, 0.0), end, &[], &constraints);
        let path = astar_route(&req).unwrap();
        assert_eq!(path[path.len() - 1].point, end);
        assert!(path.windows(2).all(|w| is_axis_aligned(w[0].point, w[1].point)));
    }

    #[test]
    fn enclosed_start_is_unreachable() {
        let obs = vec![blocker("CAGE", Rect::new(-10.0, -10.0, 20.0, 20.0))];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &obs, &constraints);
        assert!(astar_route(&req).is_none());
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let constraints = RoutingConstraints {
            grid_size: 1.0,
            ..RoutingConstraints::default()
        };
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(1000.0, 1000.0), &[], &constraints);
        assert!(astar_route(&req).is_none());
    }

    #[test]
    fn heuristic_counts_steps() {
        assert_eq!(heuristic((0, 0), (0, 0)), 0.0);
        assert_eq!(heuristic((0, 0), (3, -4)), 7.0);
    }

    #[test]
    fn reconstruct_single_hop() {
        let start = NodeKey {
            cell: (0, 0),
            heading: None,
        };
        let end = NodeKey {
            cell: (1, 0),
            heading: Some(0),
        };
        let mut came_from = HashMap::new();
        came_from.insert(end, start);
        assert_eq!(reconstruct_path(&came_from, start, end), vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn vanishing_grid_step_is_rejected() {
        let constraints = RoutingConstraints {
            grid_size: 1e-17,
            ..RoutingConstraints::default()
        };
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 40.0), &[], &constraints);
        assert!(astar_route(&req).is_none());
    }

    #[test]
    fn route_keeps_clearance_from_obstacles() {
        let rect = Rect::new(40.0, -30.0, 20.0, 60.0);
        let obs = vec![blocker("B", rect)];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &obs, &constraints);
        let path = astar_route(&req).unwrap();
        let zone = vec![blocker("B", rect.inflate(req.clearance))];
        assert_eq!(colliding_segment_count(&path, &zone, &[]), 0);
    }

    #[test]
    fn routed_wire_is_not_retraced() {
        let routed = vec![RoutedWire {
            connection: "sibling".into(),
            points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
        }];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest {
            routed: &routed,
            ..RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &[], &constraints)
        };
        let path = astar_route(&req).unwrap();
        assert_ne!(points(&path), routed[0].points);
        assert_eq!(path[0].point, Point::new(0.0, 0.0));
        assert_eq!(path[path.len() - 1].point, Point::new(100.0, 0.0));
    }

    #[test]
    fn edge_on_routed_segment_is_detected() {
        let routed = vec![RoutedWire {
            connection: "sibling".into(),
            points: vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 60.0)],
        }];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest {
            routed: &routed,
            ..RouteRequest::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0), &[], &constraints)
        };
        assert!(runs_along_routed(Point::new(20.0, 0.0), Point::new(40.0, 0.0), &req));
        assert!(runs_along_routed(Point::new(100.0, 20.0), Point::new(100.0, 40.0), &req));
        assert!(!runs_along_routed(Point::new(20.0, 20.0), Point::new(40.0, 20.0), &req));
        assert!(!runs_along_routed(Point::new(100.0, 0.0), Point::new(120.0, 0.0), &req));
    }
}
