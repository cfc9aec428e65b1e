//! Iterative path refinement by hill climbing.
//!
//! Each round asks a [`PathImprover`] for one perturbed path, rescores it,
//! and keeps it only if the score went up. The loop stops when
//! `max_iterations` is reached, when an accepted move gains less than
//! `convergence_threshold` (relative), when too many proposals in a row fail
//! to improve, or when the improver has nothing left to propose.

use crate::path::{dedup, RoutingPoint};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sld_config::{OptimizerSettings, RoutingConstraints};
use sld_geom::{is_axis_aligned, EPSILON};
use std::time::Instant;

/// Consecutive rejected proposals after which the loop gives up.
const STALL_LIMIT: usize = 10;

/// Attempts an improver makes before reporting it has nothing to offer.
const PROPOSAL_ATTEMPTS: usize = 8;

/// Weight of the final score in the confidence blend; the baseline gets the rest.
const QUALITY_WEIGHT: f64 = 0.5;

/// Weight of the observed improvement added on top of the blend.
const IMPROVEMENT_WEIGHT: f64 = 0.2;

/// A strategy that proposes a perturbed version of a path.
///
/// Proposals must keep the first and last points in place. Returning `None`
/// means the path offers nothing to perturb and ends the optimization loop.
pub trait PathImprover: Send + Sync {
    /// Short name, reported in [`OptimizationStats::improver`].
    fn name(&self) -> &str;

    /// Proposes a single perturbation of `path`.
    fn propose(
        &self,
        path: &[RoutingPoint],
        constraints: &RoutingConstraints,
        rng: &mut StdRng,
    ) -> Option<Vec<RoutingPoint>>;
}

/// Moves one waypoint (or one interior segment, for orthogonal paths) by
/// one or two grid steps.
///
/// With `prefer_orthogonal`, a whole interior segment shifts perpendicular to
/// itself so both neighbours stay axis-aligned. Otherwise a single interior
/// point moves freely on the grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaypointNudge;

impl PathImprover for WaypointNudge {
    fn name(&self) -> &str {
        "waypoint-nudge"
    }

    fn propose(
        &self,
        path: &[RoutingPoint],
        constraints: &RoutingConstraints,
        rng: &mut StdRng,
    ) -> Option<Vec<RoutingPoint>> {
        let step = constraints.grid_size;
        let orthogonal = constraints.prefer_orthogonal;
        // Segment nudges need an interior segment, point nudges an interior point.
        let min_len = if orthogonal { 4 } else { 3 };
        if path.len() < min_len {
            return None;
        }
        let keep_axes = orthogonal && is_orthogonal(path);
        for _ in 0..PROPOSAL_ATTEMPTS {
            let proposal = if orthogonal {
                nudge_segment(path, step, rng)
            } else {
                nudge_point(path, step, rng)
            };
            let Some(candidate) = proposal.map(|p| dedup(&p)) else {
                continue;
            };
            if !keep_axes || is_orthogonal(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

fn is_orthogonal(path: &[RoutingPoint]) -> bool {
    path.windows(2).all(|w| is_axis_aligned(w[0].point, w[1].point))
}

fn grid_delta(step: f64, rng: &mut StdRng) -> f64 {
    let magnitude = step * rng.gen_range(1..=2) as f64;
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// Shifts segment `i → i+1` (both interior) perpendicular to itself.
/// Diagonal segments are left alone.
fn nudge_segment(path: &[RoutingPoint], step: f64, rng: &mut StdRng) -> Option<Vec<RoutingPoint>> {
    let i = rng.gen_range(1..path.len() - 2);
    let (a, b) = (path[i].point, path[i + 1].point);
    let delta = grid_delta(step, rng);

    let mut out = path.to_vec();
    if (a.y - b.y).abs() <= EPSILON {
        out[i].point.y += delta;
        out[i + 1].point.y += delta;
    } else if (a.x - b.x).abs() <= EPSILON {
        out[i].point.x += delta;
        out[i + 1].point.x += delta;
    } else {
        return None;
    }
    Some(out)
}

/// Moves one interior point by up to one grid step on each axis.
fn nudge_point(path: &[RoutingPoint], step: f64, rng: &mut StdRng) -> Option<Vec<RoutingPoint>> {
    let i = rng.gen_range(1..path.len() - 1);
    let (dx, dy) = loop {
        let dx = rng.gen_range(-1i32..=1) as f64 * step;
        let dy = rng.gen_range(-1i32..=1) as f64 * step;
        if dx != 0.0 || dy != 0.0 {
            break (dx, dy);
        }
    };
    let mut out = path.to_vec();
    out[i].point = out[i].point.offset(dx, dy);
    Some(out)
}

/// Measurements from one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStats {
    /// Name of the improver that proposed the moves.
    pub improver: String,
    /// Rounds executed (at most `max_iterations`).
    pub iterations: usize,
    /// Score of the path handed in.
    pub initial_score: f64,
    /// Score of the path handed back.
    pub final_score: f64,
    /// `(final − initial) / initial × 100`, or 0 when nothing improved.
    pub improvement_percent: f64,
    /// Wall-clock time spent, in milliseconds.
    pub processing_ms: f64,
}

/// An optimized path with its stats.
#[derive(Debug, Clone)]
pub struct Optimized {
    /// Best path found; never scores below the input.
    pub path: Vec<RoutingPoint>,
    /// Run measurements.
    pub stats: OptimizationStats,
}

/// Hill-climbs `path` under `evaluate`, which maps a path to a score.
pub fn optimize(
    path: Vec<RoutingPoint>,
    improver: &dyn PathImprover,
    settings: &OptimizerSettings,
    constraints: &RoutingConstraints,
    rng: &mut StdRng,
    evaluate: impl Fn(&[RoutingPoint]) -> f64,
) -> Optimized {
    let started = Instant::now();
    let initial_score = evaluate(&path);
    let mut best = path;
    let mut best_score = initial_score;
    let mut iterations = 0;
    let mut stalled = 0;

    while iterations < settings.max_iterations {
        iterations += 1;
        let Some(candidate) = improver.propose(&best, constraints, rng) else {
            break;
        };
        let candidate_score = evaluate(&candidate);
        if candidate_score > best_score {
            let gain = (candidate_score - best_score) / best_score.max(f64::EPSILON);
            best = candidate;
            best_score = candidate_score;
            stalled = 0;
            if gain < settings.convergence_threshold {
                break;
            }
        } else {
            stalled += 1;
            if stalled >= STALL_LIMIT {
                break;
            }
        }
    }

    let improvement_percent = if best_score > initial_score {
        (best_score - initial_score) / initial_score.max(f64::EPSILON) * 100.0
    } else {
        0.0
    };
    Optimized {
        path: best,
        stats: OptimizationStats {
            improver: improver.name().to_string(),
            iterations,
            initial_score,
            final_score: best_score,
            improvement_percent,
            processing_ms: started.elapsed().as_secs_f64() * 1000.0,
        },
    }
}

/// Confidence in `[0, 1]`: the baseline blended with the final score, plus
/// a bonus for measured improvement.
pub fn confidence(stats: &OptimizationStats, baseline: f64) -> f64 {
    let blend = baseline * (1.0 - QUALITY_WEIGHT) + stats.final_score * QUALITY_WEIGHT;
    let bonus = IMPROVEMENT_WEIGHT * (stats.improvement_percent / 100.0).clamp(0.0, 1.0);
    (blend + bonus).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score;
    use rand::SeedableRng;
    use sld_geom::Point;

    fn z_path() -> Vec<RoutingPoint> {
        vec![
            RoutingPoint::start(Point::new(0.0, 0.0)),
            RoutingPoint::waypoint(Point::new(50.0, 0.0)),
            RoutingPoint::corner(Point::new(50.0, 40.0)),
            RoutingPoint::end(Point::new(100.0, 40.0)),
        ]
    }

    /// Improver that never proposes anything.
    struct Inert;

    impl PathImprover for Inert {
        fn name(&self) -> &str {
            "inert"
        }

        fn propose(
            &self,
            _path: &[RoutingPoint],
            _constraints: &RoutingConstraints,
            _rng: &mut StdRng,
        ) -> Option<Vec<RoutingPoint>> {
            None
        }
    }

    #[test]
    fn segment_nudge_keeps_orthogonality_and_endpoints() {
        let constraints = RoutingConstraints::default();
        let mut rng = StdRng::seed_from_u64(1);
        let original = z_path();
        for _ in 0..50 {
            let next = WaypointNudge.propose(&original, &constraints, &mut rng).unwrap();
            assert_eq!(next[0].point, original[0].point);
            assert_eq!(next[next.len() - 1].point, original[3].point);
            assert!(next.windows(2).all(|w| is_axis_aligned(w[0].point, w[1].point)));
        }
    }

    #[test]
    fn nothing_to_nudge_on_two_points() {
        let constraints = RoutingConstraints::default();
        let mut rng = StdRng::seed_from_u64(1);
        let straight = vec![
            RoutingPoint::start(Point::new(0.0, 0.0)),
            RoutingPoint::end(Point::new(100.0, 0.0)),
        ];
        assert!(WaypointNudge.propose(&straight, &constraints, &mut rng).is_none());
    }

    #[test]
    fn loop_respects_iteration_budget_and_never_worsens() {
        let constraints = RoutingConstraints::default();
        let settings = OptimizerSettings {
            max_iterations: 5,
            ..OptimizerSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let input = z_path();
        let input_score = score(&input, 0);
        let out = optimize(input, &WaypointNudge, &settings, &constraints, &mut rng, |p| {
            score(p, 0)
        });
        assert!(out.stats.iterations <= 5);
        assert!(out.stats.final_score >= input_score);
        assert_eq!(out.stats.initial_score, input_score);
    }

    #[test]
    fn inert_improver_stops_immediately() {
        let constraints = RoutingConstraints::default();
        let settings = OptimizerSettings::default();
        let mut rng = StdRng::seed_from_u64(0);
        let out = optimize(z_path(), &Inert, &settings, &constraints, &mut rng, |p| score(p, 0));
        assert_eq!(out.stats.iterations, 1);
        assert_eq!(out.stats.improver, "inert");
        assert_eq!(out.path, z_path());
        assert_eq!(out.stats.improvement_percent, 0.0);
    }

    #[test]
    fn optimizer_escapes_collision_when_nudge_helps() {
        // Jog at x = 50 is penalized; any shifted jog scores higher.
        let constraints = RoutingConstraints::default();
        let settings = OptimizerSettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        let evaluate = |p: &[RoutingPoint]| {
            let hits = p
                .iter()
                .filter(|rp| (rp.point.x - 50.0).abs() < 1e-9)
                .count();
            score(p, hits)
        };
        let out = optimize(z_path(), &WaypointNudge, &settings, &constraints, &mut rng, evaluate);
        assert!(out.stats.final_score > out.stats.initial_score);
        assert!(out.stats.improvement_percent > 0.0);
        assert_eq!(out.path[0].point, Point::new(0.0, 0.0));
    }

    #[test]
    fn confidence_is_clamped_blend() {
        let stats = OptimizationStats {
            improver: "waypoint-nudge".into(),
            iterations: 3,
            initial_score: 0.5,
            final_score: 0.9,
            improvement_percent: 80.0,
            processing_ms: 0.1,
        };
        assert_eq!(confidence(&stats, 0.85), 1.0);

        let modest = OptimizationStats {
            final_score: 0.8,
            improvement_percent: 10.0,
            ..stats.clone()
        };
        assert!((confidence(&modest, 0.8) - 0.82).abs() < 1e-9);

        let flat = OptimizationStats {
            improvement_percent: 0.0,
            final_score: 0.0,
            ..stats
        };
        assert!((confidence(&flat, 0.8) - 0.4).abs() < 1e-9);
    }
}
