//! Path generation for single connections.
//!
//! Three strategies are available: a straight [`direct`] segment, an
//! orthogonal Manhattan route that accepts or rejects candidate shapes by
//! collision checks, and an A* grid search that falls back to Manhattan
//! when the grid is too large or no route exists. The strategy that actually
//! produced a path is reported in [`GeneratedPath::algorithm_used`].

mod astar;
mod manhattan;

use crate::collision::RoutedWire;
use crate::obstacles::Obstacle;
use crate::path::RoutingPoint;
use sld_config::{RoutingConstraints, RoutingMethod};
use sld_geom::Point;

/// Everything the generator needs to route one connection.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// Source terminal position.
    pub start: Point,
    /// Target terminal position.
    pub end: Point,
    /// Obstacles to avoid.
    pub obstacles: &'a [Obstacle],
    /// Components the wire may touch (its own source and target).
    pub exclude: &'a [&'a str],
    /// Clearance this wire needs from foreign components.
    pub clearance: f64,
    /// Active constraint profile.
    pub constraints: &'a RoutingConstraints,
    /// Wires already routed in this batch, for crossing minimization.
    pub routed: &'a [RoutedWire],
    /// Parallel-wire lane; jogs shift by one grid step per lane.
    pub lane: usize,
}

impl<'a> RouteRequest<'a> {
    /// A request with no exclusions, no routed wires, lane zero, and the
    /// constraint set's minimum clearance.
    pub fn new(
        start: Point,
        end: Point,
        obstacles: &'a [Obstacle],
        constraints: &'a RoutingConstraints,
    ) -> Self {
        Self {
            start,
            end,
            obstacles,
            exclude: &[],
            clearance: constraints.min_clearance,
            constraints,
            routed: &[],
            lane: 0,
        }
    }
}

/// A generated path and the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPath {
    /// Start-to-end routing points.
    pub path: Vec<RoutingPoint>,
    /// Strategy that produced `path`; differs from the request after a fallback.
    pub algorithm_used: RoutingMethod,
}

/// Generates a path for `request` with the given strategy.
///
/// Never fails: a fully blocked request yields the best available path,
/// which may still collide.
pub fn generate(request: &RouteRequest<'_>, method: RoutingMethod) -> GeneratedPath {
    match method {
        RoutingMethod::Direct => GeneratedPath {
            path: direct(request.start, request.end),
            algorithm_used: RoutingMethod::Direct,
        },
        RoutingMethod::Manhattan => GeneratedPath {
            path: manhattan::manhattan_route(request),
            algorithm_used: RoutingMethod::Manhattan,
        },
        RoutingMethod::Astar => match astar::astar_route(request) {
            Some(path) => GeneratedPath {
                path,
                algorithm_used: RoutingMethod::Astar,
            },
            None => GeneratedPath {
                path: manhattan::manhattan_route(request),
                algorithm_used: RoutingMethod::Manhattan,
            },
        },
    }
}

/// The two-point path `[start, end]`.
pub fn direct(start: Point, end: Point) -> Vec<RoutingPoint> {
    vec![RoutingPoint::start(start), RoutingPoint::end(end)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ObstacleId;
    use crate::path::points;
    use sld_geom::{is_axis_aligned, Rect};

    fn blocker(rect: Rect) -> Obstacle {
        Obstacle {
            id: ObstacleId::from_raw(0),
            component: "BLOCK".into(),
            rect,
            priority: 5,
        }
    }

    #[test]
    fn direct_ignores_obstacles() {
        let obs = vec![blocker(Rect::new(40.0, -10.0, 20.0, 20.0))];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &obs, &constraints);
        let out = generate(&req, RoutingMethod::Direct);
        assert_eq!(points(&out.path), vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert_eq!(out.algorithm_used, RoutingMethod::Direct);
    }

    #[test]
    fn astar_reports_itself_when_it_succeeds() {
        let obs = vec![blocker(Rect::new(40.0, -30.0, 20.0, 60.0))];
        let constraints = RoutingConstraints::default();
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &obs, &constraints);
        let out = generate(&req, RoutingMethod::Astar);
        assert_eq!(out.algorithm_used, RoutingMethod::Astar);
        assert_eq!(out.path[0].point, Point::new(0.0, 0.0));
        assert_eq!(out.path[out.path.len() - 1].point, Point::new(100.0, 0.0));
    }

    #[test]
    fn astar_falls_back_to_manhattan_on_huge_grid() {
        let constraints = RoutingConstraints {
            grid_size: 0.5,
            ..RoutingConstraints::default()
        };
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(5000.0, 4000.0), &[], &constraints);
        let out = generate(&req, RoutingMethod::Astar);
        assert_eq!(out.algorithm_used, RoutingMethod::Manhattan);
        let pts = points(&out.path);
        assert!(pts.windows(2).all(|w| is_axis_aligned(w[0], w[1])));
    }

    #[test]
    fn astar_falls_back_on_vanishing_grid_step() {
        let constraints = RoutingConstraints {
            grid_size: 1e-17,
            ..RoutingConstraints::default()
        };
        let req = RouteRequest::new(Point::new(0.0, 0.0), Point::new(100.0, 40.0), &[], &constraints);
        let out = generate(&req, RoutingMethod::Astar);
        assert_eq!(out.algorithm_used, RoutingMethod::Manhattan);
        assert_eq!(out.path[0].point, Point::new(0.0, 0.0));
        assert_eq!(out.path[out.path.len() - 1].point, Point::new(100.0, 40.0));
    }
}
