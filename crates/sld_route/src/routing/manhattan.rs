//! Orthogonal routing by candidate accept/reject.
//!
//! Candidates are tried in a fixed order: the Z-route along the dominant
//! axis, the Z-route along the other axis, both L-routes, then U-shaped
//! detours around whatever blocks the first Z-route. The first candidate
//! with no colliding segment wins. When crossing minimization is on, every
//! collision-free candidate is considered and the one crossing the fewest
//! routed wires wins. When nothing is collision-free the candidate with the
//! fewest colliding segments is returned so the detector can flag it.

use super::{direct, RouteRequest};
use crate::collision::{colliding_segment_count, segment_collides, wire_crossings};
use crate::path::{dedup, RoutingPoint};
use sld_geom::{Point, Rect};

pub(crate) fn manhattan_route(request: &RouteRequest<'_>) -> Vec<RoutingPoint> {
    let (start, end) = (request.start, request.end);
    if start.is_close(end) {
        return direct(start, end);
    }

    let candidates = candidates(request);
    let collisions: Vec<usize> = candidates
        .iter()
        .map(|c| colliding_segment_count(c, request.obstacles, request.exclude))
        .collect();

    let mut clear = candidates
        .iter()
        .zip(&collisions)
        .filter(|(_, &hits)| hits == 0)
        .map(|(c, _)| c);

    let chosen = if request.constraints.minimize_crossings && !request.routed.is_empty() {
        clear.min_by_key(|c| wire_crossings(c, request.routed).len())
    } else {
        clear.next()
    };

    match chosen {
        Some(path) => path.clone(),
        None => candidates
            .iter()
            .zip(&collisions)
            .min_by_key(|(_, &hits)| hits)
            .map(|(c, _)| c.clone())
            .unwrap_or_else(|| direct(start, end)),
    }
}

fn candidates(request: &RouteRequest<'_>) -> Vec<Vec<RoutingPoint>> {
    let (start, end) = (request.start, request.end);
    let jog = request.lane as f64 * request.constraints.grid_size;
    let horizontal_first = (end.x - start.x).abs() >= (end.y - start.y).abs();

    let horizontal = z_horizontal(start, end, jog);
    let vertical = z_vertical(start, end, jog);
    let (primary, alternate) = if horizontal_first {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    let mut out = Vec::with_capacity(7);
    if !request.constraints.prefer_orthogonal {
        out.push(direct(start, end));
    }
    let detours = detours(request, &primary, horizontal_first);
    out.push(primary);
    out.push(alternate);
    out.push(l_route(start, Point::new(end.x, start.y), end));
    out.push(l_route(start, Point::new(start.x, end.y), end));
    out.extend(detours);
    out.iter().map(|c| dedup(c)).collect()
}

fn z_horizontal(start: Point, end: Point, jog: f64) -> Vec<RoutingPoint> {
    let mid_x = (start.x + end.x) / 2.0 + jog;
    vec![
        RoutingPoint::start(start),
        RoutingPoint::waypoint(Point::new(mid_x, start.y)),
        RoutingPoint::corner(Point::new(mid_x, end.y)),
        RoutingPoint::end(end),
    ]
}

fn z_vertical(start: Point, end: Point, jog: f64) -> Vec<RoutingPoint> {
    let mid_y = (start.y + end.y) / 2.0 + jog;
    vec![
        RoutingPoint::start(start),
        RoutingPoint::waypoint(Point::new(start.x, mid_y)),
        RoutingPoint::corner(Point::new(end.x, mid_y)),
        RoutingPoint::end(end),
    ]
}

fn l_route(start: Point, corner: Point, end: Point) -> Vec<RoutingPoint> {
    vec![
        RoutingPoint::start(start),
        RoutingPoint::corner(corner),
        RoutingPoint::end(end),
    ]
}

/// U-shaped routes through channels just outside the obstacles hit by `primary`.
///
/// Channels sit half a grid step beyond the wire's clearance from the union of
/// the blocking obstacles, on both sides of the dominant axis, pushed out one
/// more grid step per parallel-wire lane. The side nearer the endpoints comes
/// first.
fn detours(
    request: &RouteRequest<'_>,
    primary: &[RoutingPoint],
    horizontal_first: bool,
) -> Vec<Vec<RoutingPoint>> {
    let Some(blocked) = blocking_bounds(request, primary) else {
        return Vec::new();
    };
    let (start, end) = (request.start, request.end);
    let step = request.constraints.grid_size;
    let margin = request.clearance + step / 2.0 + request.lane as f64 * step;

    let mut channels = if horizontal_first {
        [blocked.min_y() - margin, blocked.max_y() + margin]
    } else {
        [blocked.min_x() - margin, blocked.max_x() + margin]
    };
    let detour_cost = |c: f64| {
        if horizontal_first {
            (c - start.y).abs() + (c - end.y).abs()
        } else {
            (c - start.x).abs() + (c - end.x).abs()
        }
    };
    channels.sort_by(|a, b| detour_cost(*a).total_cmp(&detour_cost(*b)));

    channels
        .iter()
        .map(|&c| {
            let (first, second) = if horizontal_first {
                (Point::new(start.x, c), Point::new(end.x, c))
            } else {
                (Point::new(c, start.y), Point::new(c, end.y))
            };
            vec![
                RoutingPoint::start(start),
                RoutingPoint::corner(first),
                RoutingPoint::corner(second),
                RoutingPoint::end(end),
            ]
        })
        .collect()
}

/// Union of the obstacles the primary candidate runs into, if any.
fn blocking_bounds(request: &RouteRequest<'_>, primary: &[RoutingPoint]) -> Option<Rect> {
    let mut bounds: Option<(Point, Point)> = None;
    for w in primary.windows(2) {
        let (a, b) = (w[0].point, w[1].point);
        for obstacle in request.obstacles {
            if !segment_collides(a, b, std::slice::from_ref(obstacle), request.exclude) {
                continue;
            }
            let r = &obstacle.rect;
            let (lo, hi) = bounds.get_or_insert((
                Point::new(r.min_x(), r.min_y()),
                Point::new(r.max_x(), r.max_y()),
            ));
            *lo = Point::new(lo.x.min(r.min_x()), lo.y.min(r.min_y()));
            *hi = Point::new(hi.x.max(r.max_x()), hi.y.max(r.max_y()));
        }
    }
    bounds.map(|(lo, hi)| Rect::from_corners(lo, hi))
}
