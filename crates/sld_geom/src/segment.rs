//! Segment intersection tests, shared runs, and angles.

use crate::point::{Point, EPSILON};
use crate::rect::Rect;

/// Returns where segment `p1-p2` meets segment `q1-q2`, if it does.
///
/// Uses the parametric form `p1 + t·r = q1 + u·s` and accepts `t, u ∈ [0, 1]`.
/// Parallel and collinear segments (zero determinant) never intersect.
pub fn segment_intersection(p1: Point, p2: Point, q1: Point, q2: Point) -> Option<Point> {
    let (rx, ry) = p1.delta_to(p2);
    let (sx, sy) = q1.delta_to(q2);
    let denom = rx * sy - ry * sx;
    if denom.abs() < EPSILON {
        return None;
    }

    let (qpx, qpy) = p1.delta_to(q1);
    let t = (qpx * sy - qpy * sx) / denom;
    let u = (qpx * ry - qpy * rx) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(p1.x + t * rx, p1.y + t * ry))
    } else {
        None
    }
}

/// Returns `true` if segment `p1-p2` intersects segment `q1-q2`.
///
/// See [`segment_intersection`] for the parallel-segment convention.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    segment_intersection(p1, p2, q1, q2).is_some()
}

/// Returns `true` if segment `p1-p2` crosses any edge of `rect`.
///
/// The segment's bounding box is tested against the rectangle first; only
/// survivors pay for the four edge intersection tests. A segment lying wholly
/// inside the rectangle crosses no edge and is not reported.
pub fn segment_intersects_rect(p1: Point, p2: Point, rect: &Rect) -> bool {
    if !Rect::from_corners(p1, p2).overlaps(rect) {
        return false;
    }
    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(p1, p2, e1, e2))
}

/// The edge crossing of `p1-p2` with `rect` closest to `p1`, if any.
pub fn segment_rect_entry(p1: Point, p2: Point, rect: &Rect) -> Option<Point> {
    if !Rect::from_corners(p1, p2).overlaps(rect) {
        return None;
    }
    rect.edges()
        .iter()
        .filter_map(|&(e1, e2)| segment_intersection(p1, p2, e1, e2))
        .min_by(|a, b| p1.distance(*a).total_cmp(&p1.distance(*b)))
}

/// Length of the stretch that segments `p1-p2` and `q1-q2` share.
///
/// Zero unless both ends of `q1-q2` lie on the line through `p1-p2`, so
/// crossing or merely touching segments share nothing.
pub fn collinear_overlap(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    let (dx, dy) = p1.delta_to(p2);
    let len = dx.hypot(dy);
    if len < EPSILON {
        return 0.0;
    }
    let off_line = |p: Point| ((p.x - p1.x) * dy - (p.y - p1.y) * dx).abs() / len;
    if off_line(q1) > EPSILON || off_line(q2) > EPSILON {
        return 0.0;
    }
    let along = |p: Point| ((p.x - p1.x) * dx + (p.y - p1.y) * dy) / len;
    let (a, b) = (along(q1), along(q2));
    (a.max(b).min(len) - a.min(b).max(0.0)).max(0.0)
}

/// Heading of the vector `from → to` in degrees, in `(-180, 180]`.
pub fn heading_degrees(from: Point, to: Point) -> f64 {
    let (dx, dy) = from.delta_to(to);
    dy.atan2(dx).to_degrees()
}

/// Deviation from straight at `b` when travelling `a → b → c`, in `[0, 180]`.
///
/// The heading difference is normalized to `[0°, 360°)` and reduced to the
/// smaller of it and its complement, so a straight run yields `0` and a
/// full reversal yields `180`. The interior bend angle is `180 − turn`.
pub fn turn_angle(a: Point, b: Point, c: Point) -> f64 {
    let diff = (heading_degrees(b, c) - heading_degrees(a, b)).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Returns `true` if the segment is purely horizontal or purely vertical.
pub fn is_axis_aligned(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= EPSILON || (a.y - b.y).abs() <= EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        ));
    }

    #[test]
    fn disjoint_segments() {
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, 1.0),
        ));
    }

    #[test]
    fn touching_endpoints_intersect() {
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
        ));
    }

    #[test]
    fn parallel_segments_never_intersect() {
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(8.0, 0.0),
        ));
    }

    #[test]
    fn segment_through_rect() {
        let r = Rect::new(40.0, -10.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            &r
        ));
    }

    #[test]
    fn segment_beside_rect() {
        let r = Rect::new(40.0, -10.0, 20.0, 20.0);
        assert!(!segment_intersects_rect(
            Point::new(0.0, 30.0),
            Point::new(100.0, 30.0),
            &r
        ));
    }

    #[test]
    fn segment_inside_rect_crosses_no_edge() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!segment_intersects_rect(
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            &r
        ));
    }

    #[test]
    fn rect_test_is_symmetric() {
        let r = Rect::new(40.0, -10.0, 20.0, 20.0);
        let a = Point::new(0.0, 5.0);
        let b = Point::new(90.0, -5.0);
        assert_eq!(
            segment_intersects_rect(a, b, &r),
            segment_intersects_rect(b, a, &r)
        );
    }

    #[test]
    fn intersection_point() {
        let hit = segment_intersection(
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 10.0),
        );
        assert_eq!(hit, Some(Point::new(4.0, 5.0)));
    }

    #[test]
    fn rect_entry_is_nearest_crossing() {
        let r = Rect::new(40.0, -10.0, 20.0, 20.0);
        let entry = segment_rect_entry(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &r);
        assert_eq!(entry, Some(Point::new(40.0, 0.0)));
        let exit = segment_rect_entry(Point::new(100.0, 0.0), Point::new(0.0, 0.0), &r);
        assert_eq!(exit, Some(Point::new(60.0, 0.0)));
    }

    #[test]
    fn collinear_overlap_measures_shared_run() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(collinear_overlap(a, b, Point::new(4.0, 0.0), Point::new(20.0, 0.0)), 6.0);
        assert_eq!(collinear_overlap(a, b, Point::new(12.0, 0.0), Point::new(3.0, 0.0)), 7.0);
        // Touching end to end, parallel, and crossing segments share nothing.
        assert_eq!(collinear_overlap(a, b, b, Point::new(20.0, 0.0)), 0.0);
        assert_eq!(collinear_overlap(a, b, Point::new(0.0, 2.0), Point::new(10.0, 2.0)), 0.0);
        assert_eq!(collinear_overlap(a, b, Point::new(5.0, -5.0), Point::new(5.0, 5.0)), 0.0);
        assert_eq!(collinear_overlap(a, a, a, b), 0.0);
    }

    #[test]
    fn turn_angles() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((turn_angle(a, b, Point::new(20.0, 0.0))).abs() < 1e-9);
        assert!((turn_angle(a, b, Point::new(10.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((turn_angle(a, b, Point::new(10.0, -10.0)) - 90.0).abs() < 1e-9);
        assert!((turn_angle(a, b, Point::new(0.0, 0.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn axis_alignment() {
        assert!(is_axis_aligned(Point::new(0.0, 0.0), Point::new(0.0, 9.0)));
        assert!(is_axis_aligned(Point::new(0.0, 3.0), Point::new(9.0, 3.0)));
        assert!(!is_axis_aligned(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
    }
}
