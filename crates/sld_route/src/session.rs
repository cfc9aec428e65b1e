//! Batch orchestration: one session routes whole diagrams.
//!
//! A [`RoutingSession`] owns the engine configuration, the path improver, and
//! the routing history. For each batch it builds the obstacle model once, then
//! runs every connection through generate → optimize → simplify → style →
//! detect issues, and computes alternative paths under varied constraint
//! profiles. Input problems on one connection are recorded as a
//! [`RouteFailure`] and never stop the batch.

use crate::collision::{
    clearance_violations, path_collisions, shared_runs, wire_crossings, CollisionRecord,
    RoutedWire,
};
use crate::error::RouteError;
use crate::history::{EngineStats, RoutingHistory};
use crate::issues::{detect_issues, input_failure, ALGORITHM_FALLBACK};
use crate::model::{Component, ConductorClass, Connection, Diagram, Terminal, TerminalRole};
use crate::obstacles::{Obstacle, ObstacleModel};
use crate::optimize::{confidence, optimize, OptimizationStats, PathImprover, WaypointNudge};
use crate::path::{points, RoutingPoint};
use crate::routing::{generate, RouteRequest};
use crate::scoring::PathScore;
use crate::simplify::simplify_with_tolerance;
use crate::style::{resolve_style, style_segments, StyledSegment, WireStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use sld_config::{EngineConfig, RoutingConstraints, RoutingMethod};
use sld_diagnostics::{Diagnostic, DiagnosticSink};
use sld_geom::Point;
use std::collections::HashMap;

/// A constraint variation used to compute an alternative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlternativeProfile {
    /// Diagonal segments allowed.
    RelaxedOrthogonality,
    /// Clearance and component padding doubled.
    DoubledClearance,
    /// Crossing minimization forced on.
    CrossingMinimization,
}

impl AlternativeProfile {
    /// Profiles in the order alternatives are computed.
    pub const ALL: [AlternativeProfile; 3] = [
        AlternativeProfile::RelaxedOrthogonality,
        AlternativeProfile::DoubledClearance,
        AlternativeProfile::CrossingMinimization,
    ];

    /// Derives the constraint set for this profile from `base`.
    pub fn apply(self, base: &RoutingConstraints) -> RoutingConstraints {
        let mut constraints = base.clone();
        match self {
            AlternativeProfile::RelaxedOrthogonality => constraints.prefer_orthogonal = false,
            AlternativeProfile::DoubledClearance => {
                constraints.min_clearance *= 2.0;
                constraints.component_padding *= 2.0;
            }
            AlternativeProfile::CrossingMinimization => constraints.minimize_crossings = true,
        }
        constraints
    }
}

/// An alternative path for a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativePath {
    /// Profile that produced the path.
    pub profile: AlternativeProfile,
    /// Simplified path.
    pub path: Vec<RoutingPoint>,
    /// Score against the real obstacles.
    pub score: f64,
    /// Component overlaps against the real obstacles.
    pub collisions: usize,
}

/// Everything the engine knows about one routed connection.
///
/// Owned by the caller; the session keeps only a summary in its history.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingResult {
    /// Connection id.
    pub connection_id: String,
    /// Final, simplified path.
    pub path: Vec<RoutingPoint>,
    /// Drawable segments of `path`.
    pub segments: Vec<StyledSegment>,
    /// Resolved wire style.
    pub style: WireStyle,
    /// Paths computed under alternative profiles.
    pub alternatives: Vec<AlternativePath>,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Score of the final path.
    pub score: f64,
    /// Optimizer measurements.
    pub stats: OptimizationStats,
    /// Overlaps, clearance violations and wire crossings on the final path.
    pub collisions: Vec<CollisionRecord>,
    /// Issues found on the final path.
    pub issues: Vec<Diagnostic>,
    /// Strategy the constraints asked for.
    pub requested_method: RoutingMethod,
    /// Strategy that produced the path.
    pub algorithm_used: RoutingMethod,
}

impl RoutingResult {
    /// Returns `true` if the requested strategy fell back to another one.
    pub fn fell_back(&self) -> bool {
        self.requested_method != self.algorithm_used
    }

    /// Returns `true` if any issue is error-level or worse.
    pub fn has_blocking_issues(&self) -> bool {
        self.issues.iter().any(|d| d.severity.is_error())
    }
}

/// A connection that could not be routed.
#[derive(Debug)]
pub struct RouteFailure {
    /// Connection id.
    pub connection: String,
    /// Why routing was skipped.
    pub error: RouteError,
}

/// Outcome of one batch, in routing order.
#[derive(Debug, Default)]
pub struct RoutingBatch {
    /// Routed connections.
    pub results: Vec<RoutingResult>,
    /// Connections skipped on input errors.
    pub failures: Vec<RouteFailure>,
}

impl RoutingBatch {
    /// The result for connection `id`, if it was routed.
    pub fn result(&self, id: &str) -> Option<&RoutingResult> {
        self.results.iter().find(|r| r.connection_id == id)
    }
}

/// A routing engine instance.
///
/// Configuration is read-only once the session is built. The history is the
/// only state that outlives a batch.
pub struct RoutingSession {
    config: EngineConfig,
    improver: Box<dyn PathImprover>,
    scorer: PathScore,
    history: RoutingHistory,
}

impl RoutingSession {
    /// Creates a session with the default waypoint-nudge improver.
    pub fn new(config: EngineConfig) -> Self {
        let history = RoutingHistory::new(config.history.capacity);
        Self {
            config,
            improver: Box::new(WaypointNudge),
            scorer: PathScore::default(),
            history,
        }
    }

    /// Replaces the path improver.
    pub fn with_improver(mut self, improver: Box<dyn PathImprover>) -> Self {
        self.improver = improver;
        self
    }

    /// The session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The routing history.
    pub fn history(&self) -> &RoutingHistory {
        &self.history
    }

    /// Capability and usage summary.
    pub fn stats(&self) -> EngineStats {
        self.history.stats()
    }

    /// Stores a user correction for `connection`.
    pub fn record_feedback(&self, connection: &str, corrected_path: Vec<Point>, note: Option<String>) {
        self.history.record_feedback(connection, corrected_path, note);
    }

    /// Routes a diagram under the session's routing constraints.
    pub fn route_diagram(&self, diagram: &Diagram, sink: &DiagnosticSink) -> RoutingBatch {
        self.route_all(
            &diagram.connections,
            &diagram.components,
            &self.config.routing,
            sink,
        )
    }

    /// Routes `connections` among `components` under `constraints`.
    ///
    /// Issues and input failures are also emitted into `sink`.
    pub fn route_all(
        &self,
        connections: &[Connection],
        components: &[Component],
        constraints: &RoutingConstraints,
        sink: &DiagnosticSink,
    ) -> RoutingBatch {
        let model = ObstacleModel::build(components, constraints.component_padding);
        let padded = (constraints.alternative_count > 0)
            .then(|| model.inflated(constraints.component_padding));

        let mut order: Vec<&Connection> = connections.iter().collect();
        if constraints.sort_by_priority {
            order.sort_by(|a, b| b.priority().total_cmp(&a.priority()));
        }

        let mut batch = RoutingBatch::default();
        let mut routed: Vec<RoutedWire> = Vec::new();
        let mut lanes: HashMap<(String, String), usize> = HashMap::new();

        for (ordinal, connection) in order.into_iter().enumerate() {
            let (source, target) = match resolve_ends(&model, connection) {
                Ok(ends) => ends,
                Err(error) => {
                    sink.emit(input_failure(&connection.id, &error));
                    batch.failures.push(RouteFailure {
                        connection: connection.id.clone(),
                        error,
                    });
                    continue;
                }
            };

            let lane = if constraints.group_parallel_wires {
                let key = pair_key(&source.component, &target.component);
                let slot = lanes.entry(key).or_insert(0);
                let lane = *slot;
                *slot += 1;
                lane
            } else {
                0
            };

            let exclude = [source.component.as_str(), target.component.as_str()];
            let request = RouteRequest {
                start: source.position,
                end: target.position,
                obstacles: model.obstacles(),
                exclude: &exclude,
                clearance: constraints.spacing_for_voltage(connection.voltage),
                constraints,
                routed: &routed,
                lane,
            };

            let result = self.route_one(
                connection,
                &request,
                padded.as_deref().unwrap_or(&[]),
                ordinal as u64,
            );
            sink.extend(result.issues.iter().cloned());
            self.history.record(&result);
            routed.push(RoutedWire {
                connection: connection.id.clone(),
                points: points(&result.path),
            });
            batch.results.push(result);
        }
        batch
    }

    fn route_one(
        &self,
        connection: &Connection,
        request: &RouteRequest<'_>,
        padded: &[Obstacle],
        ordinal: u64,
    ) -> RoutingResult {
        let constraints = request.constraints;
        let requested_method = constraints.method;
        let generated = generate(request, requested_method);

        // Segments retracing a routed wire count as collisions.
        let evaluate = |path: &[RoutingPoint]| {
            let overlaps = path_collisions(path, request.obstacles, request.exclude).len();
            self.scorer.score(path, overlaps + shared_runs(path, request.routed))
        };
        let mut rng = StdRng::seed_from_u64(self.config.optimizer.seed.wrapping_add(ordinal));
        let optimized = optimize(
            generated.path,
            self.improver.as_ref(),
            &self.config.optimizer,
            constraints,
            &mut rng,
            evaluate,
        );
        let path = simplify_with_tolerance(&optimized.path, constraints.collinear_tolerance);
        let score = evaluate(&path);

        let style = resolve_style(connection, &self.config.style);
        let segments = style_segments(&path, &style);

        let mut collisions = path_collisions(&path, request.obstacles, request.exclude);
        collisions.extend(clearance_violations(
            &path,
            request.obstacles,
            request.exclude,
            request.clearance,
        ));
        collisions.extend(wire_crossings(&path, request.routed));

        let mut issues = detect_issues(&connection.id, &path, &collisions, constraints);
        if generated.algorithm_used != requested_method {
            issues.push(
                Diagnostic::note(
                    ALGORITHM_FALLBACK,
                    format!(
                        "{requested_method} routing fell back to {}",
                        generated.algorithm_used
                    ),
                )
                .for_connection(&connection.id)
                .with_help("raise routing.grid_size or route this connection manually"),
            );
        }

        let alternatives = AlternativeProfile::ALL
            .iter()
            .take(constraints.alternative_count)
            .map(|&profile| self.alternative(profile, request, padded))
            .collect();

        RoutingResult {
            connection_id: connection.id.clone(),
            path,
            segments,
            style,
            alternatives,
            confidence: confidence(&optimized.stats, self.config.optimizer.baseline_confidence),
            score,
            stats: optimized.stats,
            collisions,
            issues,
            requested_method,
            algorithm_used: generated.algorithm_used,
        }
    }

    fn alternative(
        &self,
        profile: AlternativeProfile,
        request: &RouteRequest<'_>,
        padded: &[Obstacle],
    ) -> AlternativePath {
        let constraints = profile.apply(request.constraints);
        let (obstacles, clearance) = match profile {
            AlternativeProfile::DoubledClearance => (padded, request.clearance * 2.0),
            _ => (request.obstacles, request.clearance),
        };
        let varied = RouteRequest {
            obstacles,
            clearance,
            constraints: &constraints,
            ..*request
        };
        let generated = generate(&varied, constraints.method);
        let path = simplify_with_tolerance(&generated.path, constraints.collinear_tolerance);
        let collisions = path_collisions(&path, request.obstacles, request.exclude).len();
        AlternativePath {
            profile,
            score: self.scorer.score(&path, collisions),
            path,
            collisions,
        }
    }
}

impl Default for RoutingSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn resolve_ends<'m>(
    model: &'m ObstacleModel,
    connection: &Connection,
) -> Result<(&'m Terminal, &'m Terminal), RouteError> {
    use TerminalRole as R;
    let (source_roles, target_roles): (&[TerminalRole], &[TerminalRole]) =
        if connection.class == ConductorClass::Ground {
            (
                &[R::Ground, R::Output, R::Bidirectional],
                &[R::Ground, R::Input, R::Bidirectional],
            )
        } else {
            (&[R::Output, R::Bidirectional], &[R::Input, R::Bidirectional])
        };
    let source = model.resolve_terminal(&connection.source, source_roles)?;
    let target = model.resolve_terminal(&connection.target, target_roles)?;
    Ok((source, target))
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
