//! Collinear waypoint removal.

use crate::path::RoutingPoint;

/// Cross-product tolerance used by [`simplify`].
pub const DEFAULT_COLLINEAR_TOLERANCE: f64 = 1.0;

/// Removes interior points whose incoming and outgoing directions are
/// collinear, using [`DEFAULT_COLLINEAR_TOLERANCE`].
pub fn simplify(path: &[RoutingPoint]) -> Vec<RoutingPoint> {
    simplify_with_tolerance(path, DEFAULT_COLLINEAR_TOLERANCE)
}

/// Removes an interior point when `|dx1·dy2 − dy1·dx2| ≤ tolerance` for its
/// incoming and outgoing vectors. Coincident points have a zero cross product
/// and are removed too. Endpoints always stay.
///
/// Passes repeat until nothing changes, so the result is a fixed point and
/// simplifying it again returns it unchanged.
pub fn simplify_with_tolerance(path: &[RoutingPoint], tolerance: f64) -> Vec<RoutingPoint> {
    let mut current = path.to_vec();
    loop {
        let next = simplify_pass(&current, tolerance);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn simplify_pass(path: &[RoutingPoint], tolerance: f64) -> Vec<RoutingPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut out: Vec<RoutingPoint> = Vec::with_capacity(path.len());
    out.push(path[0]);
    for i in 1..path.len() - 1 {
        let prev = out[out.len() - 1].point;
        let here = path[i].point;
        let next = path[i + 1].point;
        let (dx1, dy1) = prev.delta_to(here);
        let (dx2, dy2) = here.delta_to(next);
        if (dx1 * dy2 - dy1 * dx2).abs() > tolerance {
            out.push(path[i]);
        }
    }
    out.push(path[path.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::points;
    use sld_geom::Point;

    fn path(pts: &[(f64, f64)]) -> Vec<RoutingPoint> {
        let last = pts.len() - 1;
        pts.iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let p = Point::new(x, y);
                match i {
                    0 => RoutingPoint::start(p),
                    i if i == last => RoutingPoint::end(p),
                    _ => RoutingPoint::waypoint(p),
                }
            })
            .collect()
    }

    #[test]
    fn drops_collinear_points() {
        let p = path(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (100.0, 40.0)]);
        assert_eq!(
            points(&simplify(&p)),
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 40.0)]
        );
    }

    #[test]
    fn keeps_corners() {
        let p = path(&[(0.0, 0.0), (50.0, 0.0), (50.0, 40.0), (100.0, 40.0)]);
        assert_eq!(simplify(&p), p);
    }

    #[test]
    fn keeps_endpoints_of_straight_line() {
        let p = path(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        let out = simplify(&p);
        assert_eq!(points(&out), vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0)]);
    }

    #[test]
    fn removes_duplicate_points() {
        let p = path(&[(0.0, 0.0), (0.0, 0.0), (50.0, 0.0), (50.0, 40.0)]);
        assert_eq!(simplify(&p).len(), 3);
    }

    #[test]
    fn idempotent() {
        let inputs = [
            path(&[(0.0, 0.0), (10.0, 0.2), (20.0, 0.0), (30.0, 0.5), (30.0, 40.0)]),
            path(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0), (10.0, 20.0), (0.0, 20.0)]),
            path(&[(0.0, 0.0), (100.0, 0.0)]),
        ];
        for p in inputs {
            let once = simplify(&p);
            assert_eq!(simplify(&once), once);
        }
    }

    #[test]
    fn tolerance_is_configurable() {
        let p = path(&[(0.0, 0.0), (10.0, 0.5), (20.0, 0.0)]);
        assert_eq!(simplify_with_tolerance(&p, 1.0).len(), 3);
        assert_eq!(simplify_with_tolerance(&p, 20.0).len(), 2);
    }
}
