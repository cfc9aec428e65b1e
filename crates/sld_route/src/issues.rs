//! Issue detection on finished routes.
//!
//! Issues are ordinary [`Diagnostic`]s tagged with the connection they
//! concern. Whether an `error` or `critical` issue blocks acceptance of a
//! diagram is the caller's decision.

use crate::collision::{CollisionKind, CollisionRecord};
use crate::error::RouteError;
use crate::path::{length, turn_angles, RoutingPoint};
use crate::scoring::complexity;
use sld_config::RoutingConstraints;
use sld_diagnostics::{Category, Diagnostic, DiagnosticCode, Label, Severity};
use sld_geom::heading_degrees;

/// `I001`: connection names an unknown component.
pub const UNKNOWN_COMPONENT: DiagnosticCode = DiagnosticCode::new(Category::Input, 1);
/// `I002`: connection names an unknown terminal.
pub const UNKNOWN_TERMINAL: DiagnosticCode = DiagnosticCode::new(Category::Input, 2);
/// `I003`: component exposes no terminals.
pub const NO_TERMINALS: DiagnosticCode = DiagnosticCode::new(Category::Input, 3);
/// `I004`: history export could not be produced.
pub const EXPORT_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Input, 4);
/// `R101`: route longer than `max_wire_length`.
pub const WIRE_TOO_LONG: DiagnosticCode = DiagnosticCode::new(Category::Route, 101);
/// `R102`: bend sharper than `max_bend_angle`.
pub const SHARP_BEND: DiagnosticCode = DiagnosticCode::new(Category::Route, 102);
/// `R103`: more bends than `max_bends`.
pub const TOO_MANY_BENDS: DiagnosticCode = DiagnosticCode::new(Category::Route, 103);
/// `R104`: high path complexity.
pub const HIGH_COMPLEXITY: DiagnosticCode = DiagnosticCode::new(Category::Route, 104);
/// `R105`: requested algorithm fell back to another.
pub const ALGORITHM_FALLBACK: DiagnosticCode = DiagnosticCode::new(Category::Route, 105);
/// `X201`: critical collisions.
pub const CRITICAL_COLLISIONS: DiagnosticCode = DiagnosticCode::new(Category::Collision, 201);
/// `X202`: non-critical component overlaps.
pub const COMPONENT_OVERLAPS: DiagnosticCode = DiagnosticCode::new(Category::Collision, 202);
/// `X203`: clearance violations.
pub const CLEARANCE_VIOLATIONS: DiagnosticCode = DiagnosticCode::new(Category::Collision, 203);
/// `X204`: wire crossings.
pub const WIRE_CROSSINGS: DiagnosticCode = DiagnosticCode::new(Category::Collision, 204);
/// `C301`: segment off the preferred angle set.
pub const NON_PREFERRED_ANGLE: DiagnosticCode = DiagnosticCode::new(Category::Convention, 301);

/// Complexity above which a route gets an advisory note. Orthogonal routes sit at 0.5.
pub const COMPLEXITY_ADVISORY: f64 = 0.6;

/// Turns smaller than this (degrees) do not count as bends.
const BEND_EPSILON: f64 = 1.0;

/// Tolerance when matching a segment heading to a preferred angle (degrees).
const ANGLE_TOLERANCE: f64 = 1.0;

/// The error diagnostic reported when `connection` cannot be routed.
pub fn input_failure(connection: &str, error: &RouteError) -> Diagnostic {
    let code = match error {
        RouteError::UnknownComponent(_) => UNKNOWN_COMPONENT,
        RouteError::UnknownTerminal { .. } => UNKNOWN_TERMINAL,
        RouteError::NoTerminals(_) => NO_TERMINALS,
        RouteError::UnsupportedFormat(_) | RouteError::Serialize(_) => EXPORT_FAILED,
    };
    Diagnostic::error(code, error.to_string())
        .for_connection(connection)
        .with_note("connection skipped; the rest of the batch was routed")
}

/// Detects geometric and collision issues on a finished path.
pub fn detect_issues(
    connection: &str,
    path: &[RoutingPoint],
    collisions: &[CollisionRecord],
    constraints: &RoutingConstraints,
) -> Vec<Diagnostic> {
    let mut issues = Vec::new();

    let total = length(path);
    if total > constraints.max_wire_length {
        issues.push(
            Diagnostic::warning(
                WIRE_TOO_LONG,
                format!(
                    "wire length {total:.1} exceeds the {:.1} limit",
                    constraints.max_wire_length
                ),
            )
            .with_help("move the components closer together or split the run"),
        );
    }

    let turns = turn_angles(path);
    for (i, &turn) in turns.iter().enumerate() {
        if turn > constraints.max_bend_angle {
            let at = path[i + 1].point;
            issues.push(
                Diagnostic::error(
                    SHARP_BEND,
                    format!(
                        "sharp bend: turns {turn:.1}° (interior angle {:.1}°), limit is {:.1}°",
                        180.0 - turn,
                        constraints.max_bend_angle
                    ),
                )
                .at(at)
                .with_label(Label::new(path[i].point, "incoming segment starts here")),
            );
        }
    }

    let bends = turns.iter().filter(|&&t| t > BEND_EPSILON).count();
    if bends > constraints.max_bends {
        issues.push(Diagnostic::warning(
            TOO_MANY_BENDS,
            format!("{bends} bends exceed the limit of {}", constraints.max_bends),
        ));
    }

    let complexity = complexity(path);
    if complexity > COMPLEXITY_ADVISORY {
        issues.push(
            Diagnostic::note(HIGH_COMPLEXITY, format!("high path complexity {complexity:.2}"))
                .with_help("consider an orthogonal route with fewer bends"),
        );
    }

    issues.extend(collision_issues(collisions));

    if !constraints.preferred_angles.is_empty() {
        let off_angle = path
            .windows(2)
            .filter(|w| !w[0].point.is_close(w[1].point))
            .find(|w| !is_preferred(heading_degrees(w[0].point, w[1].point), &constraints.preferred_angles));
        if let Some(w) = off_angle {
            let heading = heading_degrees(w[0].point, w[1].point).rem_euclid(360.0);
            issues.push(
                Diagnostic::note(
                    NON_PREFERRED_ANGLE,
                    format!("segment runs at {heading:.1}°, outside the preferred angles"),
                )
                .at(w[0].point),
            );
        }
    }

    issues
        .into_iter()
        .map(|d| d.for_connection(connection))
        .collect()
}

fn collision_issues(collisions: &[CollisionRecord]) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    let critical: Vec<&CollisionRecord> = collisions
        .iter()
        .filter(|c| c.severity == Severity::Critical)
        .collect();
    if let Some(first) = critical.first() {
        out.push(summary(
            Diagnostic::critical(
                CRITICAL_COLLISIONS,
                format!("{} critical collision(s)", critical.len()),
            ),
            &critical,
            first,
        ));
    }

    for (kind, code, noun) in [
        (CollisionKind::ComponentOverlap, COMPONENT_OVERLAPS, "component overlap(s)"),
        (CollisionKind::ClearanceViolation, CLEARANCE_VIOLATIONS, "clearance violation(s)"),
        (CollisionKind::WireCrossing, WIRE_CROSSINGS, "wire crossing(s)"),
    ] {
        let records: Vec<&CollisionRecord> = collisions
            .iter()
            .filter(|c| c.kind == kind && c.severity != Severity::Critical)
            .collect();
        let Some(first) = records.first() else {
            continue;
        };
        let severity = records
            .iter()
            .map(|c| c.severity)
            .max()
            .unwrap_or(Severity::Warning);
        out.push(summary(
            Diagnostic::new(severity, code, format!("{} {noun}", records.len())),
            &records,
            first,
        ));
    }
    out
}

fn summary(diag: Diagnostic, records: &[&CollisionRecord], first: &CollisionRecord) -> Diagnostic {
    records.iter().fold(diag.at(first.point), |d, c| {
        d.with_label(Label::new(c.point, c.description.clone()))
    })
}

fn is_preferred(heading: f64, preferred: &[f64]) -> bool {
    let heading = heading.rem_euclid(360.0);
    preferred.iter().any(|&angle| {
        let diff = (heading - angle.rem_euclid(360.0)).abs();
        diff <= ANGLE_TOLERANCE || (360.0 - diff) <= ANGLE_TOLERANCE
    })
}
