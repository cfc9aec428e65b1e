//! Wire routing and collision avoidance for electrical single-line diagrams.
//!
//! This crate takes placed components and the electrical connections between
//! them and produces, for every connection, a drawable path with a resolved
//! wire style, collision records, advisory issues, and a handful of
//! alternative paths. Routing never fails on geometry: a blocked connection
//! still gets its best path, flagged through [`Diagnostic`](sld_diagnostics::Diagnostic)s.
//!
//! # Pipeline
//!
//! 1. **Obstacles**: pad every component body and resolve its terminals
//! 2. **Generate**: direct, Manhattan, or A* path between two terminals
//! 3. **Optimize**: seeded hill climbing under the path score
//! 4. **Simplify**: drop collinear waypoints
//! 5. **Style**: pick a preset from voltage and conductor class
//! 6. **Detect**: length, bend, complexity, collision and angle issues
//!
//! # Usage
//!
//! ```ignore
//! use sld_route::{RoutingSession, Diagram};
//! use sld_diagnostics::DiagnosticSink;
//!
//! let session = RoutingSession::new(config);
//! let sink = DiagnosticSink::new();
//! let batch = session.route_diagram(&diagram, &sink);
//! for result in &batch.results {
//!     println!("{}: {} points", result.connection_id, result.path.len());
//! }
//! ```

#![warn(missing_docs)]

pub mod collision;
pub mod error;
pub mod history;
pub mod ids;
pub mod issues;
pub mod model;
pub mod obstacles;
pub mod optimize;
pub mod path;
pub mod routing;
pub mod scoring;
pub mod session;
pub mod simplify;
pub mod style;
pub mod terminals;

pub use collision::{CollisionKind, CollisionRecord, RoutedWire};
pub use error::RouteError;
pub use history::{EngineStats, ExportFormat, FeedbackEntry, HistoryEntry, RoutingHistory};
pub use ids::{HistoryEntryId, ObstacleId};
pub use issues::detect_issues;
pub use model::{
    Component, ComponentKind, ConductorClass, Connection, Diagram, Endpoint, Terminal,
    TerminalRole, TerminalSpec,
};
pub use obstacles::{Obstacle, ObstacleModel};
pub use optimize::{OptimizationStats, PathImprover, WaypointNudge};
pub use path::{PointRole, RoutingPoint};
pub use routing::{generate, GeneratedPath, RouteRequest};
pub use scoring::{complexity, score, PathScore};
pub use session::{
    AlternativePath, AlternativeProfile, RouteFailure, RoutingBatch, RoutingResult, RoutingSession,
};
pub use simplify::{simplify, simplify_with_tolerance};
pub use style::{resolve_style, StylePreset, StyledSegment, WireStyle};

use sld_config::RoutingConstraints;
use sld_diagnostics::DiagnosticSink;

/// Routes a batch of connections with a default-configured session.
///
/// The session, and with it the routing history, is dropped on return. Use a
/// [`RoutingSession`] directly to keep history across batches.
pub fn route_all(
    connections: &[Connection],
    components: &[Component],
    constraints: &RoutingConstraints,
    sink: &DiagnosticSink,
) -> RoutingBatch {
    RoutingSession::default().route_all(connections, components, constraints, sink)
}
