//! Path quality scoring.
//!
//! A path starts at a perfect 1.0 and loses points for length, for turning,
//! and for every collision recorded against it. The result is clamped to
//! `[0, 1]` so scores from different connections compare directly.

use crate::path::{length, turn_angles, RoutingPoint};

/// Weights for the path score components.
#[derive(Debug, Clone)]
pub struct PathScore {
    /// Penalty per plane unit of path length.
    pub weight_length: f64,
    /// Cap on the total length penalty.
    pub max_length_penalty: f64,
    /// Penalty per unit of complexity.
    pub weight_complexity: f64,
    /// Cap on the total complexity penalty.
    pub max_complexity_penalty: f64,
    /// Flat penalty per collision record.
    pub collision_penalty: f64,
}

impl Default for PathScore {
    fn default() -> Self {
        Self {
            weight_length: 0.0001,
            max_length_penalty: 0.3,
            weight_complexity: 0.3,
            max_complexity_penalty: 0.3,
            collision_penalty: 0.2,
        }
    }
}

impl PathScore {
    /// Scores a path carrying `collisions` collision records.
    pub fn score(&self, path: &[RoutingPoint], collisions: usize) -> f64 {
        let length_penalty = (length(path) * self.weight_length).min(self.max_length_penalty);
        let complexity_penalty =
            (complexity(path) * self.weight_complexity).min(self.max_complexity_penalty);
        let collision_penalty = collisions as f64 * self.collision_penalty;
        (1.0 - length_penalty - complexity_penalty - collision_penalty).clamp(0.0, 1.0)
    }
}

/// Scores a path with the default weights.
pub fn score(path: &[RoutingPoint], collisions: usize) -> f64 {
    PathScore::default().score(path, collisions)
}

/// Mean deviation from straight over interior points, in `[0, 1]`.
///
/// Each interior point contributes `|180° − bend| / 180°`, where `bend` is
/// the interior angle between its two segments. Paths with fewer than three
/// points have no interior and score zero.
pub fn complexity(path: &[RoutingPoint]) -> f64 {
    let turns = turn_angles(path);
    if turns.is_empty() {
        return 0.0;
    }
    let total: f64 = turns
        .iter()
        .map(|turn| {
            let bend = 180.0 - turn;
            (180.0 - bend).abs() / 180.0
        })
        .sum();
    total / turns.len() as f64
}
